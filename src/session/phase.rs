use std::time::{Duration, Instant};

use generic_array::ArrayLength;
use log::debug;

use crate::core::{Board, Cell, Stone, WinLine};

/// How many times the win line is repainted before the session resets.
pub const FLASH_CYCLES: u32 = 10;
/// Time between two repaints of the win line.
pub const FLASH_INTERVAL: Duration = Duration::from_millis(500);
/// How long a drawn (full, winless) board stays on display before the reset.
pub const FULL_BOARD_PAUSE: Duration = Duration::from_secs(5);

/// What the session is doing between placements.
///
/// The celebratory and pause phases are deadline-driven: the surrounding
/// tick loop keeps calling [`SessionPhase::advance`] with the current time,
/// and resets the session once it reports completion. No input is accepted
/// outside [`SessionPhase::Playing`].
#[derive(Clone, Debug)]
pub enum SessionPhase {
    /// Accepting placements.
    Playing,
    /// A win line is being flashed: alternately highlight and the winning
    /// color, starting with highlight, ending on the winning color.
    Celebrating {
        line: WinLine,
        winner: Stone,
        flips_left: u32,
        next_flip: Instant,
    },
    /// The board filled up with no winner; holding still until the reset.
    Pausing { until: Instant },
}

impl SessionPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Decides the phase after a placement. A win takes precedence over a
    /// full board, so filling the last cell with a completed line is a win,
    /// not a draw.
    pub fn settle<S: ArrayLength>(board: &Board<S>, now: Instant) -> Self {
        if let Some(line) = board.five_in_a_row() {
            if let Some(winner) = board.get(line.anchor()).stone() {
                debug!("{} wins through {}", winner, line.anchor());
                return Self::Celebrating {
                    line,
                    winner,
                    flips_left: FLASH_CYCLES,
                    next_flip: now,
                };
            }
        }
        if board.is_full() {
            debug!("board is full with no winner");
            return Self::Pausing {
                until: now + FULL_BOARD_PAUSE,
            };
        }
        Self::Playing
    }

    /// Advances deadline-driven work up to `now`. Returns `true` once the
    /// phase has run to completion and the session must reset.
    pub fn advance<S: ArrayLength>(&mut self, board: &mut Board<S>, now: Instant) -> bool {
        match self {
            Self::Playing => false,
            Self::Celebrating {
                line,
                winner,
                flips_left,
                next_flip,
            } => {
                while *flips_left > 0 && now >= *next_flip {
                    let cell = if *flips_left % 2 == 0 {
                        Cell::Highlight
                    } else {
                        Cell::Stone(*winner)
                    };
                    for &index in line.iter() {
                        board.paint(index, cell);
                    }
                    *flips_left -= 1;
                    *next_flip += FLASH_INTERVAL;
                }
                *flips_left == 0
            }
            Self::Pausing { until } => now >= *until,
        }
    }
}
