use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::sync::{Fork, Side};

/// Durations driving every philosopher's cycle.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    pub think: Duration,
    pub eat: Duration,
    /// Deadline for picking up both forks; missing it is terminal.
    pub starve: Duration,
    /// Extra random think time, desynchronises the ring. Zero disables it.
    pub jitter: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            think: Duration::from_millis(10),
            eat: Duration::from_millis(500),
            starve: Duration::from_millis(15_000),
            jitter: Duration::ZERO,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum PhilosopherState {
    Thinking = 0,
    Hungry = 1,
    Eating = 2,
    /// Terminal: missed the starvation deadline.
    Starved = 3,
    /// Terminal: externally requested stop.
    Stopped = 4,
}

impl PhilosopherState {
    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => PhilosopherState::Thinking,
            1 => PhilosopherState::Hungry,
            2 => PhilosopherState::Eating,
            3 => PhilosopherState::Starved,
            4 => PhilosopherState::Stopped,
            _ => unreachable!("philosopher state tag out of range"),
        }
    }
}

/// One participant in the ring: think, grab both neighboring forks, eat,
/// repeat, until stopped or starved.
pub struct Philosopher {
    id: usize,
    left: Arc<Fork>,
    right: Arc<Fork>,
    stop: AtomicBool,
    state: AtomicU8,
    meals: AtomicUsize,
    deaths: Arc<AtomicUsize>,
    timing: Timing,
}

impl Philosopher {
    pub(crate) fn new(
        id: usize,
        left: Arc<Fork>,
        right: Arc<Fork>,
        deaths: Arc<AtomicUsize>,
        timing: Timing,
    ) -> Self {
        Self {
            id,
            left,
            right,
            stop: AtomicBool::new(false),
            state: AtomicU8::new(PhilosopherState::Thinking as u8),
            meals: AtomicUsize::new(0),
            deaths,
            timing,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> PhilosopherState {
        PhilosopherState::from_tag(self.state.load(Ordering::SeqCst))
    }

    pub fn is_alive(&self) -> bool {
        !matches!(
            self.state(),
            PhilosopherState::Starved | PhilosopherState::Stopped
        )
    }

    /// Meals finished so far, safe to poll concurrently.
    pub fn meals(&self) -> usize {
        self.meals.load(Ordering::SeqCst)
    }

    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn set_state(&self, s: PhilosopherState) {
        self.state.store(s as u8, Ordering::SeqCst);
    }

    fn think_time(&self) -> Duration {
        if self.timing.jitter.is_zero() {
            self.timing.think
        } else {
            self.timing.think + self.timing.jitter.mul_f64(rand::random::<f64>())
        }
    }

    /// The philosopher's life, hosted on its own thread. The stop flag is
    /// polled once per cycle only, so shutdown waits out any in-flight meal
    /// or acquisition race.
    pub(crate) fn run(&self) {
        while !self.stop.load(Ordering::SeqCst) {
            self.set_state(PhilosopherState::Thinking);
            thread::sleep(self.think_time());
            if !self.dine() {
                tracing::info!(id = self.id, "philosopher starved");
                return;
            }
        }
        self.set_state(PhilosopherState::Stopped);
        tracing::debug!(id = self.id, "philosopher stopped");
    }

    /// One attempt at a meal. Returns false on starvation, which is terminal.
    fn dine(&self) -> bool {
        self.set_state(PhilosopherState::Hungry);
        let deadline = Instant::now() + self.timing.starve;

        // Seat 0 reaches the other way around, so the ring never ends up with
        // everyone holding one fork and waiting on the next. Both grabs are
        // attempted even if the first misses; the second then races an
        // already-expired deadline and only succeeds uncontended.
        let (have_left, have_right) = if self.id == 0 {
            let l = self.left.acquire(Side::Left, deadline);
            let r = self.right.acquire(Side::Right, deadline);
            (l, r)
        } else {
            let r = self.right.acquire(Side::Right, deadline);
            let l = self.left.acquire(Side::Left, deadline);
            (l, r)
        };

        let fed = have_left && have_right;
        if fed {
            self.set_state(PhilosopherState::Eating);
            thread::sleep(self.timing.eat);
            self.meals.fetch_add(1, Ordering::SeqCst);
        }

        // Forks go down before the terminal transition becomes observable:
        // a starved philosopher must be seen holding nothing.
        if have_left {
            self.left.release();
        }
        if have_right {
            self.right.release();
        }

        if !fed {
            self.deaths.fetch_add(1, Ordering::SeqCst);
            self.set_state(PhilosopherState::Starved);
        }
        fed
    }
}
