use std::time::Instant;

use generic_array::ArrayLength;
use log::debug;

use crate::core::{Board, Cell, GridIndex, Stone};
use crate::session::{Debounce, Placement, SessionPhase, INPUT_DEBOUNCE};

/// An offline game: both participants share the device and the turn machine
/// degrades to color alternation. The only mode where undo is available.
#[derive(Debug)]
pub struct LocalSession<S: ArrayLength> {
    board: Board<S>,
    active: Stone,
    phase: SessionPhase,
    debounce: Debounce,
}

impl<S: ArrayLength> Default for LocalSession<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ArrayLength> LocalSession<S> {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            active: Stone::Black,
            phase: SessionPhase::Playing,
            debounce: Debounce::new(INPUT_DEBOUNCE),
        }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    /// The color that moves next.
    pub fn active_stone(&self) -> Stone {
        self.active
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// Offers a placement for the active color at `now`.
    pub fn place(&mut self, index: GridIndex, now: Instant) -> Placement {
        if !self.phase.is_playing() {
            return Placement::Suspended;
        }
        if !self.debounce.try_accept(now) {
            return Placement::Debounced;
        }
        if !self.board.get(index).is_empty() {
            return Placement::Occupied;
        }

        let stone = self.active;
        self.board.place(index, Cell::Stone(stone));
        self.phase = SessionPhase::settle(&self.board, now);
        self.active = stone.opponent();
        Placement::Accepted(stone)
    }

    /// Erases the most recent placement and gives the turn back to the color
    /// that made it. No-op while celebrating or pausing.
    pub fn undo(&mut self, now: Instant) -> Option<GridIndex> {
        if !self.phase.is_playing() {
            return None;
        }
        if !self.debounce.try_accept(now) {
            return None;
        }
        let undone = self.board.undo()?;
        self.active = self.active.opponent();
        debug!("undid the placement at {}", undone);
        Some(undone)
    }

    /// Advances timed phases; call once per tick.
    pub fn tick(&mut self, now: Instant) {
        if self.phase.advance(&mut self.board, now) {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.board.reset();
        self.active = Stone::Black;
        self.phase = SessionPhase::Playing;
        self.debounce.reset();
        debug!("local session reset");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::session::{FLASH_CYCLES, FLASH_INTERVAL};
    use generic_array::typenum::U15;
    use std::time::Duration;

    fn xy(x: usize, y: usize) -> GridIndex {
        GridIndex::new(y, x)
    }

    /// Timestamps far enough apart to clear the input debounce.
    fn ticks(start: Instant) -> impl Iterator<Item = Instant> {
        (1u32..).map(move |n| start + INPUT_DEBOUNCE * n)
    }

    #[test]
    fn test_colors_alternate() {
        let mut session = LocalSession::<U15>::new();
        let mut now = ticks(Instant::now());

        assert_eq!(session.active_stone(), Stone::Black);
        assert_eq!(
            session.place(xy(7, 7), now.next().unwrap()),
            Placement::Accepted(Stone::Black)
        );
        assert_eq!(session.active_stone(), Stone::White);
        assert_eq!(
            session.place(xy(8, 8), now.next().unwrap()),
            Placement::Accepted(Stone::White)
        );
        assert_eq!(session.active_stone(), Stone::Black);
    }

    #[test]
    fn test_occupied_cell_keeps_the_turn() {
        let mut session = LocalSession::<U15>::new();
        let mut now = ticks(Instant::now());

        session.place(xy(7, 7), now.next().unwrap());
        assert_eq!(
            session.place(xy(7, 7), now.next().unwrap()),
            Placement::Occupied
        );
        assert_eq!(session.active_stone(), Stone::White);
    }

    #[test]
    fn test_debounce_rejects_rapid_input() {
        let mut session = LocalSession::<U15>::new();
        let start = Instant::now();

        session.place(xy(7, 7), start + INPUT_DEBOUNCE);
        assert_eq!(
            session.place(xy(8, 8), start + INPUT_DEBOUNCE + Duration::from_millis(50)),
            Placement::Debounced
        );
    }

    #[test]
    fn test_undo_flips_the_turn_back() {
        let mut session = LocalSession::<U15>::new();
        let mut now = ticks(Instant::now());

        session.place(xy(7, 7), now.next().unwrap());
        assert_eq!(session.undo(now.next().unwrap()), Some(xy(7, 7)));
        assert_eq!(session.active_stone(), Stone::Black);
        assert!(session.board().get(xy(7, 7)).is_empty());

        // nothing left to undo
        assert_eq!(session.undo(now.next().unwrap()), None);
    }

    #[test]
    fn test_win_suspends_input_then_resets() {
        let mut session = LocalSession::<U15>::new();
        let mut now = ticks(Instant::now());

        // black builds a row; white stays out of the way
        for x in 0..4 {
            assert!(session.place(xy(x, 7), now.next().unwrap()).is_accepted());
            assert!(session.place(xy(x, 0), now.next().unwrap()).is_accepted());
        }
        let winning_at = now.next().unwrap();
        assert!(session.place(xy(4, 7), winning_at).is_accepted());
        assert!(!session.is_playing());

        assert_eq!(
            session.place(xy(9, 9), now.next().unwrap()),
            Placement::Suspended
        );
        assert_eq!(session.undo(now.next().unwrap()), None);

        session.tick(winning_at + FLASH_INTERVAL * FLASH_CYCLES);
        assert!(session.is_playing());
        assert!(session.board().history().is_empty());
        assert_eq!(session.active_stone(), Stone::Black);
    }
}
