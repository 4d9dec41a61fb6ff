use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use super::{ForkState, Side};

const NO_PRIORITY: u8 = 0;

/// A fair, deadline-bounded exclusive lock for exactly two contenders.
///
/// A plain lock cannot promise fairness between two well-known neighbors: a
/// greedy one could re-acquire every time before the other's wakeup. The fix
/// is a single-slot priority reservation in front of the lock. Every
/// acquisition must first win the slot, so at most one side ever waits on the
/// lock itself, and that side is guaranteed the next grab once the current
/// holder lets go.
///
/// The slot is polled at a bounded interval rather than blocked on; the
/// interval trades fairness latency against wasted wakeups.
pub struct Fork {
    /// Reservation slot: `NO_PRIORITY` or a `Side` tag.
    priority: AtomicU8,
    held: Mutex<bool>,
    freed: Condvar,
    /// Observable holder tag, Relaxed, rendering only.
    state: AtomicU8,
    spin_interval: Duration,
}

impl Default for Fork {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

impl Fork {
    pub fn new(spin_interval: Duration) -> Self {
        Self {
            priority: AtomicU8::new(NO_PRIORITY),
            held: Mutex::new(false),
            freed: Condvar::new(),
            state: AtomicU8::new(ForkState::Free as u8),
            spin_interval,
        }
    }

    fn try_reserve(&self, side: Side) -> bool {
        let tag = side as u8;
        if self.priority.load(Ordering::SeqCst) == tag {
            return true;
        }
        self.priority
            .compare_exchange(NO_PRIORITY, tag, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Polls the reservation slot until it is won or `deadline` passes.
    ///
    /// Idempotent for a side that already holds the slot. On `false` the slot
    /// was never taken by this call.
    pub fn reserve(&self, side: Side, deadline: Instant) -> bool {
        while !self.try_reserve(side) {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(self.spin_interval);
        }
        true
    }

    fn clear_reservation(&self) {
        self.priority.store(NO_PRIORITY, Ordering::SeqCst);
    }

    fn lock_until(&self, deadline: Instant) -> bool {
        let mut held = self.held.lock().unwrap();
        while *held {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self.freed.wait_timeout(held, deadline - now).unwrap();
            held = guard;
        }
        *held = true;
        true
    }

    /// Attempts to take the fork for `side`, giving up once `deadline`
    /// passes. On success the fork stays held until [`Fork::release`].
    ///
    /// The reservation is dropped before returning either way: a side that is
    /// no longer waiting must not keep blocking the other side's turn.
    pub fn acquire(&self, side: Side, deadline: Instant) -> bool {
        if !self.reserve(side, deadline) {
            return false;
        }
        let got = self.lock_until(deadline);
        self.clear_reservation();
        if got {
            self.state
                .store(ForkState::from(side) as u8, Ordering::Relaxed);
        }
        got
    }

    /// Puts the fork down and wakes the waiting side, if any.
    ///
    /// # Panics
    ///
    /// Panics when the fork is not currently held; a release without a
    /// matching acquire is a caller bug, and letting it pass would corrupt
    /// the held/free bookkeeping.
    pub fn release(&self) {
        let mut held = self.held.lock().unwrap();
        assert!(*held, "released a fork that is not held");
        *held = false;
        self.state.store(ForkState::Free as u8, Ordering::Relaxed);
        self.freed.notify_one();
    }

    pub fn state(&self) -> ForkState {
        ForkState::from_tag(self.state.load(Ordering::Relaxed))
    }
}
