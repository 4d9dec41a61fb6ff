//! Terminal view of the table: philosophers and forks on a circle, drawn
//! with ANSI cursor escapes. Purely observational; reads only the snapshot
//! tags the core exposes.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use std::io::{self, Write as _};

use phi::{ForkState, Table, Timing};

const RADIUS: f64 = 20.0;
const CENTER_X: f64 = 22.0;
const CENTER_Y: f64 = 24.0;

fn plot(buf: &mut String, x: i64, y: i64, c: char) {
    // Column doubled because terminal cells are taller than wide.
    let _ = write!(buf, "\x1b[{};{}f{}", y, 2 * x, c);
}

fn plot_polar(buf: &mut String, r: f64, theta: f64, c: char) {
    let x = (CENTER_X + r * theta.cos()).round() as i64;
    let y = (CENTER_Y + r * theta.sin()).round() as i64;
    plot(buf, x, y, c);
}

pub fn draw(table: &Table, timing: &Timing) -> io::Result<()> {
    let n = table.size() as f64;
    let step = TAU / n;
    // Forks sit halfway between their two neighbors.
    let phase = PI / n;

    let mut buf = String::from("\x1b[2J\x1b[0;0f");
    let _ = writeln!(
        buf,
        "Deaths: {}  Thinking: {}ms  Starving: {}ms  Eating: {}ms",
        table.death_count(),
        timing.think.as_millis(),
        timing.starve.as_millis(),
        timing.eat.as_millis(),
    );

    for (i, p) in table.philosophers().iter().enumerate() {
        let theta = i as f64 * step;
        plot_polar(&mut buf, RADIUS, theta, if p.is_alive() { 'O' } else { 'X' });
    }

    for (i, fork) in table.forks().iter().enumerate() {
        let theta = phase + i as f64 * step;
        match fork.state() {
            ForkState::Free => plot_polar(&mut buf, RADIUS, theta, '/'),
            // A held fork leans toward whoever picked it up: the right-side
            // caller is seat i, the left-side caller seat i + 1.
            ForkState::HeldByRight => plot_polar(&mut buf, RADIUS - 2.0, theta - phase, '.'),
            ForkState::HeldByLeft => plot_polar(&mut buf, RADIUS - 2.0, theta + phase, '.'),
        }
    }

    plot(
        &mut buf,
        CENTER_X.round() as i64,
        CENTER_Y.round() as i64,
        '#',
    );
    buf.push('\n');

    let mut out = io::stdout().lock();
    out.write_all(buf.as_bytes())?;
    out.flush()
}
