//! Sequence number name components.
//!
//! Value layout (naming conventions, marker-based):
//! ```text
//! +--------+------------------------------+
//! | 0xFE   | NonNegativeInteger (1/2/4/8) |
//! +--------+------------------------------+
//! ```
//! The largest encoding is [`SEQUENCE_COMPONENT_SIZE`] octets.

use crate::core::constants::{SEQUENCE_COMPONENT_SIZE, SEQUENCE_MARKER};
use crate::core::{DecodeError, EncodeError};

use super::tlv::{decode_nonneg, encode_nonneg, nonneg_size};

/// Fixed scratch buffer sized for the worst-case sequence component.
pub type SequenceBuf = [u8; SEQUENCE_COMPONENT_SIZE];

/// Encode `seq` into the front of `out`, returning the encoded length.
pub fn encode_sequence(seq: u64, out: &mut [u8]) -> Result<usize, EncodeError> {
    let needed = 1 + nonneg_size(seq);
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    out[0] = SEQUENCE_MARKER;
    let mut scratch = [0u8; 8];
    let size = encode_nonneg(seq, &mut scratch);
    out[1..1 + size].copy_from_slice(&scratch[..size]);
    Ok(needed)
}

/// Decode a sequence component value.
pub fn decode_sequence(value: &[u8]) -> Result<u64, DecodeError> {
    match value.split_first() {
        Some((&SEQUENCE_MARKER, rest)) if matches!(rest.len(), 1 | 2 | 4 | 8) => {
            decode_nonneg(rest)
        }
        _ => Err(DecodeError::MalformedComponent),
    }
}
