use std::time::{Duration, Instant};

use phi::{PhilosopherState, Table, Timing};

fn fast(starve: Duration) -> Timing {
    Timing {
        think: Duration::ZERO,
        eat: Duration::ZERO,
        starve,
        jitter: Duration::ZERO,
    }
}

/// Spin until `cond` holds, failing the test after `limit`.
fn wait_for(limit: Duration, mut cond: impl FnMut() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(start.elapsed() < limit, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn generous_deadline_starves_nobody() {
    let mut table = Table::new(5, fast(Duration::from_secs(60))).unwrap();
    table.start_all();

    // Many full cycles per seat without a single death.
    wait_for(Duration::from_secs(60), || {
        table.philosophers().iter().all(|p| p.meals() >= 1_000)
    });

    table.request_stop_all();
    table.join_all();
    assert_eq!(table.death_count(), 0);
    assert!(table
        .philosophers()
        .iter()
        .all(|p| p.state() == PhilosopherState::Stopped));
}

#[test]
fn zero_deadline_kills_under_contention() {
    let mut table = Table::new(5, fast(Duration::ZERO)).unwrap();
    table.start_all();

    // Every contended grab fails on the spot; the first overlap between two
    // neighbors kills the loser.
    wait_for(Duration::from_secs(30), || table.death_count() > 0);

    table.request_stop_all();
    table.join_all();

    let starved = table
        .philosophers()
        .iter()
        .filter(|p| p.state() == PhilosopherState::Starved)
        .count();
    assert!(table.death_count() > 0);
    // No lost or duplicated increments, whatever the interleaving was.
    assert_eq!(table.death_count(), starved);
}

#[test]
fn two_seats_never_deadlock() {
    let mut table = Table::new(2, fast(Duration::from_secs(10))).unwrap();
    table.start_all();

    // Both acquisition orders (seat 0 left-first, seat 1 right-first) end up
    // grabbing the same fork first, so neither can hold one fork while
    // waiting forever on the other.
    wait_for(Duration::from_secs(60), || {
        table.philosophers().iter().all(|p| p.meals() >= 500)
    });

    table.request_stop_all();
    table.join_all();
    assert_eq!(table.death_count(), 0);
}
