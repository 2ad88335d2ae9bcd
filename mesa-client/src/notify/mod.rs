//! Order and print notifications
//!
//! A single background listener per session reads bus frames, forwards
//! desk events on a broadcast channel and reconnects with bounded
//! exponential backoff.

mod listener;
mod transport;

pub use listener::NotificationListener;
pub use transport::{TcpTransport, Transport};

use shared::message::FrameError;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Handshake rejected: {0}")]
    HandshakeRejected(String),

    #[error("Handshake timed out")]
    HandshakeTimeout,
}
