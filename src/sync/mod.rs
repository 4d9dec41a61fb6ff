pub mod fair_timed;

pub use fair_timed::Fork;

/// Which of a fork's two neighbors is contending for it.
///
/// A role relative to one specific fork, not a thread identity: each fork
/// has exactly two legitimate callers, one per side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Side {
    Left = 1,
    Right = 2,
}

/// Observable holder tag, for rendering only. Updated as a side effect of
/// acquire/release and carries no synchronization weight.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum ForkState {
    Free = 0,
    HeldByLeft = 1,
    HeldByRight = 2,
}

impl ForkState {
    pub(crate) fn from_tag(tag: u8) -> Self {
        match tag {
            0 => ForkState::Free,
            1 => ForkState::HeldByLeft,
            2 => ForkState::HeldByRight,
            _ => unreachable!("fork state tag out of range"),
        }
    }
}

impl From<Side> for ForkState {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => ForkState::HeldByLeft,
            Side::Right => ForkState::HeldByRight,
        }
    }
}
