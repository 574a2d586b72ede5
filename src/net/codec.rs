use byteorder::{BigEndian, ByteOrder};
use generic_array::ArrayLength;

use crate::core::GridIndex;
use crate::net::error::{WireError, WireResult};

/// Wire size of one move: x then y, both big-endian i32, no framing.
pub const MESSAGE_LEN: usize = 8;

/// The one and only message kind on the wire: the position of a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveMessage {
    pub x: i32,
    pub y: i32,
}

impl MoveMessage {
    pub fn encode(&self) -> [u8; MESSAGE_LEN] {
        let mut buf = [0; MESSAGE_LEN];
        BigEndian::write_i32(&mut buf[..4], self.x);
        BigEndian::write_i32(&mut buf[4..], self.y);
        buf
    }

    pub fn decode(buf: &[u8; MESSAGE_LEN]) -> Self {
        Self {
            x: BigEndian::read_i32(&buf[..4]),
            y: BigEndian::read_i32(&buf[4..]),
        }
    }

    /// Bounds-checked conversion onto an `S`-sided board. Remote input is
    /// untrusted, so a position outside the grid is a protocol error here
    /// rather than a panic deeper down.
    pub fn to_index<S: ArrayLength>(&self) -> WireResult<GridIndex> {
        let side = S::to_usize();
        let col = usize::try_from(self.x)
            .ok()
            .filter(|&col| col < side)
            .ok_or_else(|| WireError::invalid_column(side - 1, self.x))?;
        let row = usize::try_from(self.y)
            .ok()
            .filter(|&row| row < side)
            .ok_or_else(|| WireError::invalid_row(side - 1, self.y))?;
        Ok(GridIndex::new(row, col))
    }
}

impl From<GridIndex> for MoveMessage {
    fn from(index: GridIndex) -> Self {
        Self {
            x: index.col() as i32,
            y: index.row() as i32,
        }
    }
}
