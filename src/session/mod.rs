mod debounce;
mod local;
mod online;
mod phase;
mod turn;

use std::time::Duration;

pub use debounce::Debounce;
pub use local::LocalSession;
pub use online::OnlineSession;
pub use phase::{SessionPhase, FLASH_CYCLES, FLASH_INTERVAL, FULL_BOARD_PAUSE};
pub use turn::{TurnCoordinator, TurnState};

use crate::core::Stone;

/// Minimum time between two accepted local inputs.
pub const INPUT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Outcome of a local placement attempt. Rejections are a normal part of
/// play, not errors: the caller simply re-offers input on a later tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The move was committed with this color (and sent, when networked).
    Accepted(Stone),
    /// The target cell already holds a stone.
    Occupied,
    /// It is the remote participant's turn.
    OutOfTurn,
    /// The session is celebrating a win or pausing before a reset.
    Suspended,
    /// Too soon after the previously accepted input.
    Debounced,
}

impl Placement {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}
