//! The contract every game exposes to a host

use crate::types::{GameInfo, UserAction};

/// A running game instance
///
/// Dropping the instance is its `destroy`: implementations flush their high
/// score on drop.
pub trait Game {
    /// Feed one host action; `hold` marks a held key
    fn input(&mut self, action: UserAction, hold: bool);

    /// Advance by one host tick
    fn update(&mut self);

    /// Refresh and borrow the snapshot
    ///
    /// The borrow ends before the next `input`/`update` or drop, so a caller
    /// can never observe a stale or freed snapshot.
    fn info(&mut self) -> &GameInfo;
}

/// Builds a fresh instance, or `None` when creation fails
pub type GameFactory = Box<dyn Fn() -> Option<Box<dyn Game>>>;
