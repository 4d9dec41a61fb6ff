mod philosopher;

pub use philosopher::{Philosopher, PhilosopherState, Timing};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::sync::Fork;
use crate::Error;

/// Owns the ring: n forks, n philosophers, and the shared death counter.
///
/// Philosopher `i` reaches fork `(i - 1) mod n` on its left and fork `i` on
/// its right, so every fork is shared by exactly two neighbors. The wiring is
/// fixed at construction; nothing is added or removed while running.
pub struct Table {
    forks: Vec<Arc<Fork>>,
    philosophers: Vec<Arc<Philosopher>>,
    threads: Vec<JoinHandle<()>>,
    deaths: Arc<AtomicUsize>,
}

impl Table {
    pub fn new(seats: usize, timing: Timing) -> Result<Self, Error> {
        // One seat has no neighbor to contend with; reject it up front
        // instead of wiring a philosopher to the same fork twice.
        if seats < 2 {
            return Err(Error::TableTooSmall(seats));
        }
        let deaths = Arc::new(AtomicUsize::new(0));
        let forks: Vec<_> = (0..seats).map(|_| Arc::new(Fork::default())).collect();
        let philosophers = (0..seats)
            .map(|i| {
                Arc::new(Philosopher::new(
                    i,
                    forks[(i + seats - 1) % seats].clone(),
                    forks[i].clone(),
                    deaths.clone(),
                    timing,
                ))
            })
            .collect();
        Ok(Self {
            forks,
            philosophers,
            threads: Vec::new(),
            deaths,
        })
    }

    pub fn size(&self) -> usize {
        self.forks.len()
    }

    /// Launches one thread per philosopher. Call once.
    pub fn start_all(&mut self) {
        tracing::info!(seats = self.size(), "seating the table");
        self.threads = self
            .philosophers
            .iter()
            .map(|p| {
                let p = p.clone();
                thread::spawn(move || p.run())
            })
            .collect();
    }

    /// Flags every philosopher to stop; returns without waiting. The flags
    /// are polled once per cycle, so prompt exit is best-effort only.
    pub fn request_stop_all(&self) {
        tracing::info!("stop requested for the whole table");
        for p in &self.philosophers {
            p.request_stop();
        }
    }

    /// Waits for every philosopher thread to finish, stopped or starved.
    pub fn join_all(&mut self) {
        for th in self.threads.drain(..) {
            // A philosopher thread only panics on a broken fork contract.
            th.join().expect("philosopher thread panicked");
        }
    }

    /// Total starvations so far, safe to poll while the table runs.
    pub fn death_count(&self) -> usize {
        self.deaths.load(Ordering::SeqCst)
    }

    pub fn philosophers(&self) -> &[Arc<Philosopher>] {
        &self.philosophers
    }

    pub fn forks(&self) -> &[Arc<Fork>] {
        &self.forks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(matches!(
            Table::new(0, Timing::default()),
            Err(Error::TableTooSmall(0))
        ));
        assert!(matches!(
            Table::new(1, Timing::default()),
            Err(Error::TableTooSmall(1))
        ));
    }

    #[test]
    fn ring_has_no_open_ends() {
        let table = Table::new(5, Timing::default()).unwrap();
        assert_eq!(table.size(), 5);
        assert_eq!(table.forks().len(), table.philosophers().len());
        // Every fork is referenced by the table plus exactly two seats.
        for fork in table.forks() {
            assert_eq!(Arc::strong_count(fork), 3);
        }
    }

    #[test]
    fn stop_before_start_is_harmless() {
        let mut table = Table::new(2, Timing::default()).unwrap();
        table.request_stop_all();
        table.join_all();
        assert_eq!(table.death_count(), 0);
    }
}
