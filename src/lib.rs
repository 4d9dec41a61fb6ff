pub mod sync;
pub mod table;

pub use sync::{Fork, ForkState, Side};
pub use table::{Philosopher, PhilosopherState, Table, Timing};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a table needs at least 2 seats, got {0}")]
    TableTooSmall(usize),
}
