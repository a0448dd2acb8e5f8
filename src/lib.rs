//! Lightweight Minecraft "Server List Ping" client
//!
//! Connects to a server, sends the status handshake, picks the status JSON out of
//! the response stream and reports it together with the round-trip latency.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let result = rust_mc_ping::ping("localhost", 25565, Duration::from_millis(2000))?;
//! println!("{} ms: {}", result.latency_ms(), result.to_json());
//! # Ok::<(), rust_mc_ping::PingError>(())
//! ```


pub mod assembler;
pub mod data;
pub mod packet;
pub mod response;
pub mod session;
pub mod status;
pub mod transport;

pub use assembler::*;
pub use data::*;
pub use packet::*;
pub use response::*;
pub use session::*;
pub use status::*;
pub use transport::*;

use std::time::Duration;

/// Low-level protocol codec error
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("varint is longer than 5 bytes or out of range")]
    VarIntError,
    #[error("string is not valid utf-8")]
    StringParseError,
    #[error("length prefix exceeds the protocol maximum")]
    DataTooLongError,
    #[error("ran out of data in the middle of a value")]
    DataRanOutError,
    #[error("failed to read from stream")]
    ReadError,
    #[error("failed to write to stream")]
    WriteError,
}

/// Failure of a single ping attempt
#[derive(Debug, thiserror::Error)]
pub enum PingError {
    #[error("failed to connect: {0}")]
    Connection(#[source] std::io::Error),
    #[error("no complete status response within {0:?}")]
    Timeout(Duration),
    #[error("status response is not valid json: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to send status request: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to read status response: {0}")]
    Read(#[source] std::io::Error),
    #[error("connection closed before a complete status response arrived")]
    ConnectionClosed,
    #[error("status response exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },
    #[error("ping cancelled")]
    Cancelled,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
