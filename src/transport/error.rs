//! Transport layer error types.
//!
//! Every failure is returned as a value; no transport operation blocks
//! waiting for a link to become ready.

use std::io;

use thiserror::Error;

use super::EndpointId;

/// Transport layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// `begin` has not completed successfully.
    #[error("transport is not open")]
    NotOpen,

    /// The link cannot take the datagram right now.
    #[error("link not ready, try again")]
    WouldBlock,

    /// Datagram exceeds what the link can carry.
    #[error("datagram of {len} bytes exceeds link limit {max}")]
    TooLarge {
        /// Datagram length.
        len: usize,
        /// Link limit.
        max: usize,
    },

    /// No peer is known under this endpoint identifier.
    #[error("unknown endpoint {0}")]
    UnknownEndpoint(EndpointId),

    /// A link setup stage reported an error code.
    #[error("{stage} failed with code {code}")]
    Link {
        /// Setup stage that failed.
        stage: &'static str,
        /// Code reported by the link stack.
        code: i32,
    },

    /// The link stack refused a datagram.
    #[error("link send failed with code {0}")]
    Send(i32),

    /// I/O error (socket operations).
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// Check if retrying the same operation later can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::WouldBlock)
    }

    /// Check if the transport must be re-opened before further use.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::NotOpen | TransportError::Link { .. })
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
