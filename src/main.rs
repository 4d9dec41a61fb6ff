mod render;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use phi::{Table, Timing};

/// Dining philosophers on fair timed forks.
#[derive(Parser)]
struct Args {
    /// Seats at the table
    #[arg(default_value_t = 10)]
    seats: usize,

    /// Thinking time per cycle, ms
    #[arg(long, default_value_t = 10)]
    think_ms: u64,

    /// Eating time per meal, ms
    #[arg(long, default_value_t = 500)]
    eat_ms: u64,

    /// Deadline for picking up both forks, ms
    #[arg(long, default_value_t = 15_000)]
    starve_ms: u64,

    /// Extra random thinking time, ms; desynchronises the ring
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,

    /// Log a periodic status line instead of drawing the table
    #[arg(long)]
    headless: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        // Keep the drawing area clear of log lines.
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let timing = Timing {
        think: Duration::from_millis(args.think_ms),
        eat: Duration::from_millis(args.eat_ms),
        starve: Duration::from_millis(args.starve_ms),
        jitter: Duration::from_millis(args.jitter_ms),
    };

    let mut table = Table::new(args.seats, timing)?;
    table.start_all();

    let stopping = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    thread::spawn({
        let stopping = stopping.clone();
        move || {
            if signals.forever().next().is_some() {
                stopping.store(true, Ordering::SeqCst);
            }
        }
    });

    let tick = Duration::from_millis(if args.headless { 1_000 } else { 100 });
    while !stopping.load(Ordering::SeqCst) {
        if args.headless {
            status_line(&table);
        } else {
            render::draw(&table, &timing)?;
        }
        thread::sleep(tick);
    }

    println!("\nKilling everyone...");
    table.request_stop_all();
    table.join_all();
    println!("Total of {} philosopher(s) starved.", table.death_count());
    Ok(())
}

fn status_line(table: &Table) {
    let meals: usize = table.philosophers().iter().map(|p| p.meals()).sum();
    let alive = table.philosophers().iter().filter(|p| p.is_alive()).count();
    tracing::info!(alive, meals, deaths = table.death_count(), "table status");
}
