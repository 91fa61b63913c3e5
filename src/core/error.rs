//! Error types for ndn-ping.

use thiserror::Error;

/// Errors that can occur when decoding TLV elements or packets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended inside an element.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// A NonNegativeInteger had a length other than 1, 2, 4 or 8.
    #[error("invalid non-negative integer length: {0}")]
    InvalidInteger(usize),

    /// An element had a different type than required at this position.
    #[error("unexpected TLV type: expected {expected:#x}, got {actual:#x}")]
    UnexpectedType {
        /// Expected TLV type.
        expected: u64,
        /// Actual TLV type.
        actual: u64,
    },

    /// An unrecognized element with a critical type number.
    #[error("unrecognized critical element {0:#x}")]
    UnrecognizedCritical(u64),

    /// The outermost element is not an Interest, Data or LpPacket.
    #[error("unknown packet type {0:#x}")]
    UnknownPacket(u64),

    /// Sequence number component marker or length is inconsistent.
    #[error("malformed sequence number component")]
    MalformedComponent,

    /// Name or value exceeds the fixed capacity.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(&'static str),

    /// A required element is missing.
    #[error("missing element {0:#x}")]
    MissingElement(u64),
}

/// Errors that can occur when encoding packets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Output buffer cannot hold the encoding.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
}

/// Invalid construction parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Probe interval must be positive.
    #[error("ping interval must be greater than zero")]
    ZeroInterval,

    /// Timeout must be strictly less than the interval.
    #[error("ping timeout {timeout_ms}ms must be less than interval {interval_ms}ms")]
    TimeoutNotBelowInterval {
        /// Configured timeout.
        timeout_ms: u32,
        /// Configured interval.
        interval_ms: u32,
    },

    /// Template name has neither a sequence component nor room for one.
    #[error("probe name has no room for a sequence number component")]
    NameCapacity,
}

/// Top-level ndn-ping errors.
#[derive(Debug, Error)]
pub enum PingError {
    /// Decode error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Encode error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    /// Face error.
    #[error("face error: {0}")]
    Face(#[from] crate::face::FaceError),
}
