//! Face error types.

use thiserror::Error;

use crate::core::constants::MAX_HANDLERS;
use crate::core::EncodeError;
use crate::transport::TransportError;

/// Errors returned by [`Face`](super::Face) operations.
#[derive(Debug, Error)]
pub enum FaceError {
    /// The handler table is full.
    #[error("handler table full ({MAX_HANDLERS} handlers)")]
    TooManyHandlers,

    /// The outgoing packet does not fit the transmit buffer.
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// The transport refused the datagram.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FaceError {
    /// Check if retrying the same send later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FaceError::Transport(e) if e.is_transient())
    }
}
