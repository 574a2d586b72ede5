use std::fmt::{Display, Formatter};
use std::ops::Deref;

use generic_array::typenum::U15;
use generic_array::ArrayLength;
use smallvec::SmallVec;

use crate::core::grid::{Direction, Grid, GridIndex, AXES};
use crate::core::{Cell, Stone};

/// Number of collinear stones that wins the game.
pub const WIN_LEN: usize = 5;

/// The standard 15×15 board.
pub type StandardBoard = Board<U15>;

/// The positions of a detected win: exactly [`WIN_LEN`] entries, all holding
/// the winning color, all on one axis. The anchor (the placement that
/// completed the line) is always the last entry; the first four are listed
/// in scan order, first scan direction of the axis before the second.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinLine(SmallVec<[GridIndex; WIN_LEN]>);

impl WinLine {
    /// The placement that completed the line.
    pub fn anchor(&self) -> GridIndex {
        self.0[WIN_LEN - 1]
    }
}

impl Deref for WinLine {
    type Target = [GridIndex];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

/// An `S`×`S` grid of cells plus the ordered history of gameplay placements.
///
/// The board knows nothing about turns or networking. It does not check
/// occupancy either: callers place on [`Cell::Empty`] only, and an
/// out-of-range index is a caller bug that panics on the grid access.
#[derive(Clone, Debug)]
pub struct Board<S: ArrayLength> {
    cells: Grid<Cell, S>,
    history: Vec<GridIndex>,
}

impl<S: ArrayLength> Default for Board<S> {
    fn default() -> Self {
        Self {
            cells: Grid::default(),
            history: Vec::new(),
        }
    }
}

impl<S: ArrayLength> Display for Board<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cells)
    }
}

impl<S: ArrayLength> Board<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side length of the board.
    pub fn side(&self) -> usize {
        Grid::<Cell, S>::side()
    }

    pub fn get(&self, index: GridIndex) -> Cell {
        self.cells[index]
    }

    /// Ordered gameplay placements since the last reset.
    pub fn history(&self) -> &[GridIndex] {
        &self.history
    }

    /// The most recent gameplay placement, the anchor of the win search.
    pub fn last_move(&self) -> Option<GridIndex> {
        self.history.last().copied()
    }

    /// Writes `cell` at `index` unconditionally. Stone placements are
    /// recorded in the history; [`Cell::Empty`] and [`Cell::Highlight`]
    /// writes are not.
    pub fn place(&mut self, index: GridIndex, cell: Cell) {
        self.cells[index] = cell;
        if matches!(cell, Cell::Stone(_)) {
            self.history.push(index);
        }
    }

    /// Writes `cell` at `index` without touching the history. This is the
    /// write the win-line flash goes through, so a repainted stone is not
    /// recorded a second time.
    pub fn paint(&mut self, index: GridIndex, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Erases the most recent placement, strictly LIFO. No-op on an empty
    /// history.
    pub fn undo(&mut self) -> Option<GridIndex> {
        let last = self.history.pop()?;
        self.cells[last] = Cell::Empty;
        Some(last)
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == self.side() * self.side()
    }

    /// Clears the grid and the history.
    pub fn reset(&mut self) {
        self.cells = Grid::default();
        self.history.clear();
    }

    /// Looks for a completed line anchored at the most recent placement.
    ///
    /// For each axis, in [`AXES`] order: walk up to `WIN_LEN - 1` steps in
    /// the first direction of the pair collecting consecutive cells equal to
    /// the anchor's, stop at the first mismatch or edge, then do the same in
    /// the opposite direction. If the two runs together hold at least
    /// `WIN_LEN - 1` positions, keep exactly the first `WIN_LEN - 1` and
    /// append the anchor as the last entry. Matches from the first direction
    /// take priority when an overline yields more than four.
    pub fn five_in_a_row(&self) -> Option<WinLine> {
        let anchor = self.last_move()?;
        let target = self.cells[anchor];
        for (forward, backward) in AXES {
            let mut line: SmallVec<[GridIndex; WIN_LEN]> = SmallVec::new();
            self.extend_run(&mut line, anchor, forward, target);
            self.extend_run(&mut line, anchor, backward, target);
            if line.len() >= WIN_LEN - 1 {
                line.truncate(WIN_LEN - 1);
                line.push(anchor);
                return Some(WinLine(line));
            }
        }
        None
    }

    /// The winning color, when [`Board::five_in_a_row`] reports a line.
    pub fn winner(&self) -> Option<Stone> {
        let line = self.five_in_a_row()?;
        self.get(line.anchor()).stone()
    }

    fn extend_run(
        &self,
        line: &mut SmallVec<[GridIndex; WIN_LEN]>,
        anchor: GridIndex,
        direction: Direction,
        target: Cell,
    ) {
        for (index, cell) in self.cells.ray(anchor, direction).take(WIN_LEN - 1) {
            if *cell != target {
                break;
            }
            line.push(index);
        }
    }
}
