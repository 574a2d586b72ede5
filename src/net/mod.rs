mod codec;
mod error;
mod tcp;

pub use codec::{MoveMessage, MESSAGE_LEN};
pub use error::{WireError, WireResult};
pub use tcp::{RetryPolicy, TcpMoveChannel, DEFAULT_PORT};

/// Boundary to the peer connection: a reliable, ordered, bidirectional
/// stream that carries nothing but fixed-size move messages.
///
/// Receiving is polled once per tick and never blocks; a partially received
/// message stays inside the implementation until it is complete. Any error
/// is permanent: there is no reconnect, the session is over.
#[cfg_attr(test, mockall::automock)]
pub trait MoveChannel {
    /// Delivers the complete message or fails permanently. Implementations
    /// retry partial writes internally.
    fn send(&mut self, message: MoveMessage) -> WireResult<()>;

    /// Returns a fully decoded message, [`None`] when no complete message
    /// has arrived yet, or a permanent channel failure.
    fn try_recv(&mut self) -> WireResult<Option<MoveMessage>>;
}
