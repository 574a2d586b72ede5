use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::net::codec::{MoveMessage, MESSAGE_LEN};
use crate::net::error::{WireError, WireResult};
use crate::net::MoveChannel;

/// Port the listening side binds when none is given.
pub const DEFAULT_PORT: u16 = 1234;

/// Bounded reconnect policy for the connecting role: `attempts` tries with a
/// fixed `delay` between them, then give up with
/// [`WireError::RetriesExhausted`].
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            delay: Duration::from_millis(500),
        }
    }
}

/// [`MoveChannel`] over a non-blocking TCP stream.
///
/// Reads accumulate into an internal buffer until a whole message is
/// available, so a move split across segments is never surfaced half
/// decoded. Writes retry until the whole message is on the wire.
pub struct TcpMoveChannel {
    stream: TcpStream,
    buf: [u8; MESSAGE_LEN],
    filled: usize,
}

impl TcpMoveChannel {
    /// Wraps an established connection and switches it to the polled,
    /// non-blocking regime the session tick expects.
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            buf: [0; MESSAGE_LEN],
            filled: 0,
        })
    }

    /// Listening role: bind `port` and accept exactly one peer.
    pub fn accept(port: u16) -> WireResult<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
        info!("waiting for a peer on port {}", port);
        let (stream, peer) = listener.accept()?;
        info!("peer connected from {}", peer);
        Ok(Self::new(stream)?)
    }

    /// Connecting role: dial `addr` under the given retry policy.
    pub fn connect<A: ToSocketAddrs>(addr: A, policy: RetryPolicy) -> WireResult<Self> {
        for attempt in 1..=policy.attempts {
            match TcpStream::connect(&addr) {
                Ok(stream) => {
                    info!("connected on attempt {}", attempt);
                    return Ok(Self::new(stream)?);
                }
                Err(err) => {
                    warn!(
                        "connect attempt {}/{} failed: {}",
                        attempt, policy.attempts, err
                    );
                    thread::sleep(policy.delay);
                }
            }
        }
        Err(WireError::RetriesExhausted {
            attempts: policy.attempts,
        })
    }
}

impl MoveChannel for TcpMoveChannel {
    fn send(&mut self, message: MoveMessage) -> WireResult<()> {
        let bytes = message.encode();
        let mut written = 0;
        while written < bytes.len() {
            match self.stream.write(&bytes[written..]) {
                Ok(0) => return Err(WireError::Disconnected),
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => continue,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(classify(err)),
            }
        }
        Ok(())
    }

    fn try_recv(&mut self) -> WireResult<Option<MoveMessage>> {
        while self.filled < MESSAGE_LEN {
            match self.stream.read(&mut self.buf[self.filled..]) {
                Ok(0) => return Err(WireError::Disconnected),
                Ok(n) => self.filled += n,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(classify(err)),
            }
        }
        self.filled = 0;
        Ok(Some(MoveMessage::decode(&self.buf)))
    }
}

fn classify(err: io::Error) -> WireError {
    match err.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => WireError::Disconnected,
        _ => WireError::Io(err),
    }
}
