use std::fmt::{Display, Formatter};
use std::ops::{Deref, Index, IndexMut};

use generic_array::{ArrayLength, GenericArray};

/// Index struct to access elements in the [`Grid`].
///
/// `col` grows rightwards and `row` grows downwards, so `(col, row)` is the
/// `(x, y)` pair the rest of the crate talks about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridIndex {
    row: usize,
    col: usize,
}

impl From<(usize, usize)> for GridIndex {
    fn from(value: (usize, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for GridIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl GridIndex {
    /// Constructs a new [`GridIndex`].
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns value of `self.col`
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns value of `self.row`
    pub fn row(&self) -> usize {
        self.row
    }
}

/// One of the 8 unit steps away from a grid intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// The 4 undirected scan axes, each as an ordered pair of opposite
/// directions. The pair order is significant: line searches walk the first
/// direction before the second, and report matches in that order.
pub const AXES: [(Direction, Direction); 4] = [
    (Direction::Down, Direction::Up),
    (Direction::Right, Direction::Left),
    (Direction::UpLeft, Direction::DownRight),
    (Direction::DownLeft, Direction::UpRight),
];

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::UpLeft => Self::DownRight,
            Self::UpRight => Self::DownLeft,
            Self::DownLeft => Self::UpRight,
            Self::DownRight => Self::UpLeft,
        }
    }

    fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 1),
            Self::DownLeft => (1, -1),
            Self::DownRight => (1, 1),
        }
    }

    /// Returns the index one step away from `from`, or [`None`] when the
    /// step leaves a `side`×`side` grid.
    pub fn step(self, from: GridIndex, side: usize) -> Option<GridIndex> {
        let (row_offset, col_offset) = self.offset();
        let row = from.row.checked_add_signed(row_offset)?;
        let col = from.col.checked_add_signed(col_offset)?;
        if row >= side || col >= side {
            return None;
        }
        Some(GridIndex::new(row, col))
    }
}

/// Square two-dimensional fixed-length array that stores values and allows
/// to mutate them. The side length is defined by the generic parameter `S`.
#[derive(Clone, Debug)]
pub struct Grid<T, S: ArrayLength> {
    contents: GenericArray<GenericArray<T, S>, S>,
}

impl<T: Default, S: ArrayLength> Default for Grid<T, S> {
    fn default() -> Self {
        Self {
            contents: Default::default(),
        }
    }
}

impl<T, S: ArrayLength> Deref for Grid<T, S> {
    type Target = [GenericArray<T, S>];

    fn deref(&self) -> &Self::Target {
        self.contents.as_slice()
    }
}

impl<T: Display, S: ArrayLength> Display for Grid<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.deref() {
            for val in row {
                write!(f, "{}", val)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl<T, S: ArrayLength> Index<GridIndex> for Grid<T, S> {
    type Output = T;

    fn index(&self, index: GridIndex) -> &Self::Output {
        &self.contents[index.row()][index.col()]
    }
}

impl<T, S: ArrayLength> IndexMut<GridIndex> for Grid<T, S> {
    fn index_mut(&mut self, index: GridIndex) -> &mut Self::Output {
        &mut self.contents[index.row()][index.col()]
    }
}

impl<T, S: ArrayLength> Grid<T, S> {
    /// Side length of the grid.
    pub fn side() -> usize {
        S::to_usize()
    }

    /// Returns an iterator over indexed elements along `direction`, starting
    /// one step away from `origin` and stopping at the grid edge. The origin
    /// itself is not yielded.
    pub fn ray(&self, origin: GridIndex, direction: Direction) -> Ray<'_, T, S> {
        Ray {
            grid: self,
            cursor: origin,
            direction,
        }
    }
}

/// An iterator walking outward from an origin along one [`Direction`].
/// On each step it yields the next [`GridIndex`] and the element stored
/// there. Stops when the underlying index goes out of [`Grid`] scope.
pub struct Ray<'a, T, S: ArrayLength> {
    grid: &'a Grid<T, S>,
    cursor: GridIndex,
    direction: Direction,
}

impl<'a, T, S: ArrayLength> Iterator for Ray<'a, T, S> {
    type Item = (GridIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.direction.step(self.cursor, Grid::<T, S>::side())?;
        self.cursor = next;
        Some((next, &self.grid[next]))
    }
}
