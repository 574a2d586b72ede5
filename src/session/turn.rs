use generic_array::ArrayLength;
use log::debug;

use crate::core::{Board, Cell, GridIndex, Stone};

/// Whose move it is, from the local participant's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnState {
    /// No color assigned yet; whichever side moves first becomes black.
    #[default]
    Initial,
    /// The local participant may place.
    Ready,
    /// Awaiting the remote participant's move.
    Wait,
}

/// The turn-synchronization state machine for a networked session.
///
/// Colors are assigned on first contact: the side whose placement happens
/// first plays black, the other learns it plays white from the first
/// message it receives. While in [`TurnState::Wait`] there is at most one
/// outstanding local move, so moves cannot reorder on the wire.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnCoordinator {
    state: TurnState,
    local: Option<Stone>,
}

impl TurnCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The local participant's color, unset until first contact.
    pub fn local_stone(&self) -> Option<Stone> {
        self.local
    }

    /// Back to [`TurnState::Initial`] with no color assigned.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A locally-originated placement. Commits to the board and flips to
    /// [`TurnState::Wait`]; the first one assigns the local color black.
    /// Returns the placed color, or [`None`] when the placement is refused
    /// (not our turn, or the cell is taken).
    pub fn commit_local<S: ArrayLength>(
        &mut self,
        board: &mut Board<S>,
        index: GridIndex,
    ) -> Option<Stone> {
        match self.state {
            TurnState::Wait => None,
            TurnState::Initial | TurnState::Ready => {
                if !board.get(index).is_empty() {
                    return None;
                }
                let stone = *self.local.get_or_insert_with(|| {
                    debug!("first local placement, playing black");
                    Stone::Black
                });
                board.place(index, Cell::Stone(stone));
                self.state = TurnState::Wait;
                debug!("placed {} at {}, waiting for peer", stone, index);
                Some(stone)
            }
        }
    }

    /// A remotely-originated placement. Commits the opponent's color to the
    /// board and flips to [`TurnState::Ready`]; when it arrives before any
    /// local placement it assigns the local color white.
    pub fn commit_remote<S: ArrayLength>(
        &mut self,
        board: &mut Board<S>,
        index: GridIndex,
    ) -> Stone {
        let stone = match self.local {
            Some(local) => local.opponent(),
            None => {
                debug!("peer moved first, playing white");
                self.local = Some(Stone::White);
                Stone::Black
            }
        };
        board.place(index, Cell::Stone(stone));
        self.state = TurnState::Ready;
        debug!("peer placed {} at {}", stone, index);
        stone
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use generic_array::typenum::U15;

    fn xy(x: usize, y: usize) -> GridIndex {
        GridIndex::new(y, x)
    }

    #[test]
    fn test_local_first_contact_assigns_black() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();
        assert_eq!(turn.state(), TurnState::Initial);
        assert_eq!(turn.local_stone(), None);

        let placed = turn.commit_local(&mut board, xy(7, 7));
        assert_eq!(placed, Some(Stone::Black));
        assert_eq!(turn.state(), TurnState::Wait);
        assert_eq!(turn.local_stone(), Some(Stone::Black));
        assert_eq!(board.get(xy(7, 7)), Cell::Stone(Stone::Black));
    }

    #[test]
    fn test_remote_first_contact_assigns_white() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();

        let placed = turn.commit_remote(&mut board, xy(7, 7));
        assert_eq!(placed, Stone::Black);
        assert_eq!(turn.state(), TurnState::Ready);
        assert_eq!(turn.local_stone(), Some(Stone::White));
        assert_eq!(board.get(xy(7, 7)), Cell::Stone(Stone::Black));
    }

    #[test]
    fn test_round_trip_alternates_colors() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();

        turn.commit_local(&mut board, xy(7, 7));
        let reply = turn.commit_remote(&mut board, xy(8, 8));
        assert_eq!(reply, Stone::White);
        assert_eq!(turn.state(), TurnState::Ready);

        let placed = turn.commit_local(&mut board, xy(9, 9));
        assert_eq!(placed, Some(Stone::Black));
        assert_eq!(turn.state(), TurnState::Wait);
    }

    #[test]
    fn test_no_local_placement_while_waiting() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();

        turn.commit_local(&mut board, xy(7, 7));
        assert_eq!(turn.commit_local(&mut board, xy(8, 8)), None);
        assert!(board.get(xy(8, 8)).is_empty());
        assert_eq!(turn.state(), TurnState::Wait);
    }

    #[test]
    fn test_occupied_cell_is_refused() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();

        turn.commit_local(&mut board, xy(7, 7));
        turn.commit_remote(&mut board, xy(8, 8));
        assert_eq!(turn.commit_local(&mut board, xy(8, 8)), None);
        // the refusal did not consume the turn
        assert_eq!(turn.state(), TurnState::Ready);
        assert_eq!(board.history().len(), 2);
    }

    #[test]
    fn test_reset_unassigns_the_color() {
        let mut board = Board::<U15>::new();
        let mut turn = TurnCoordinator::new();
        turn.commit_local(&mut board, xy(7, 7));

        turn.reset();
        assert_eq!(turn.state(), TurnState::Initial);
        assert_eq!(turn.local_stone(), None);
    }
}
