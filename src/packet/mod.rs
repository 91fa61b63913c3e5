//! Minimal NDN packet codec.
//!
//! Covers the elements a reachability probe exchanges:
//!
//! - **TLV primitives**: [`TlvReader`], [`TlvWriter`]
//! - **Names**: [`Name`], [`Component`], sequence number components
//! - **Packets**: [`Interest`], [`Data`], [`Nack`] (NDNLPv2)
//!
//! Everything decodes into fixed-capacity storage; nothing allocates.

mod data;
mod interest;
mod nack;
mod name;
pub mod sequence;
pub mod tlv;

pub use data::Data;
pub use interest::Interest;
pub use nack::{Nack, NackReason};
pub use name::{Component, Name};
pub use sequence::{decode_sequence, encode_sequence, SequenceBuf};
pub use tlv::{TlvReader, TlvWriter};

use crate::core::constants::{TT_DATA, TT_INTEREST, TT_LP_FRAGMENT, TT_LP_NACK, TT_LP_PACKET};
use crate::core::{DecodeError, EncodeError};

/// A decoded network layer packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Interest.
    Interest(Interest),
    /// Data.
    Data(Data),
    /// Nack.
    Nack(Nack),
}

impl Packet {
    /// Decode one datagram.
    ///
    /// LpPackets without a Nack header are unwrapped to their fragment.
    pub fn decode(wire: &[u8]) -> Result<Self, DecodeError> {
        let mut r = TlvReader::new(wire);
        let (tlv_type, value) = r.read_tlv()?;
        match tlv_type {
            TT_INTEREST => Ok(Self::Interest(Interest::decode(value)?)),
            TT_DATA => Ok(Self::Data(Data::decode(value)?)),
            TT_LP_PACKET => Self::decode_lp(value),
            other => Err(DecodeError::UnknownPacket(other)),
        }
    }

    fn decode_lp(value: &[u8]) -> Result<Self, DecodeError> {
        let mut nack_header = None;
        let mut fragment = None;
        let mut r = TlvReader::new(value);
        while !r.is_empty() {
            let (tlv_type, v) = r.read_tlv()?;
            match tlv_type {
                TT_LP_NACK => nack_header = Some(v),
                TT_LP_FRAGMENT => fragment = Some(v),
                // Other link headers carry nothing the face uses.
                _ => {}
            }
        }

        match (nack_header, fragment) {
            (Some(header), frag) => Ok(Self::Nack(Nack::decode(header, frag)?)),
            (None, Some(frag)) => match Self::decode(frag)? {
                Self::Nack(_) => Err(DecodeError::UnknownPacket(TT_LP_PACKET)),
                inner => Ok(inner),
            },
            (None, None) => Err(DecodeError::MissingElement(TT_LP_FRAGMENT)),
        }
    }

    /// Encode into `w`.
    pub fn encode(&self, w: &mut TlvWriter<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Interest(interest) => interest.encode(w),
            Self::Data(data) => data.encode(w),
            Self::Nack(nack) => nack.encode(w),
        }
    }
}
