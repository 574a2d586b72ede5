pub type WireResult<T> = Result<T, WireError>;

/// Permanent failures of the peer connection and the move codec. None of
/// these are recoverable: the caller reports the error and ends the session.
#[derive(thiserror::Error, Debug)]
pub enum WireError {
    #[error("the network connection has been lost")]
    Disconnected,
    #[error("connection attempts exhausted after {attempts} tries")]
    RetriesExhausted { attempts: u32 },
    #[error("peer sent an invalid column (expected: 0-{max_expected}, found: {found})")]
    InvalidColumn { max_expected: usize, found: i32 },
    #[error("peer sent an invalid row (expected: 0-{max_expected}, found: {found})")]
    InvalidRow { max_expected: usize, found: i32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    pub fn invalid_column(max_expected: usize, found: i32) -> Self {
        Self::InvalidColumn {
            max_expected,
            found,
        }
    }

    pub fn invalid_row(max_expected: usize, found: i32) -> Self {
        Self::InvalidRow {
            max_expected,
            found,
        }
    }
}
