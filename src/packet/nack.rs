//! Network Nacks carried in NDNLPv2 link packets.
//!
//! Wire format:
//! ```text
//! LpPacket (0x64)
//! ├── Nack (800, wire FD 03 20)
//! │   └── NackReason (801, wire FD 03 21), optional
//! └── Fragment (0x50)
//!     └── rejected Interest
//! ```

use crate::core::constants::{
    TT_INTEREST, TT_LP_FRAGMENT, TT_LP_NACK, TT_LP_NACK_REASON, TT_LP_PACKET,
};
use crate::core::{DecodeError, EncodeError};

use super::interest::Interest;
use super::tlv::{decode_nonneg, nonneg_size, tlv_size, TlvReader, TlvWriter};

/// Why a forwarder rejected an Interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NackReason {
    /// No reason given.
    #[default]
    None,
    /// Congestion on the upstream path.
    Congestion,
    /// Duplicate nonce detected.
    Duplicate,
    /// No route to the name.
    NoRoute,
    /// A reason code this crate does not know.
    Other(u64),
}

impl NackReason {
    /// Wire code, or `None` when the reason is omitted.
    pub fn code(self) -> Option<u64> {
        match self {
            Self::None => None,
            Self::Congestion => Some(50),
            Self::Duplicate => Some(100),
            Self::NoRoute => Some(150),
            Self::Other(code) => Some(code),
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => Self::None,
            50 => Self::Congestion,
            100 => Self::Duplicate,
            150 => Self::NoRoute,
            other => Self::Other(other),
        }
    }
}

/// A rejection of an Interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nack {
    reason: NackReason,
    interest: Option<Interest>,
}

impl Nack {
    /// Create a Nack rejecting `interest`.
    pub fn new(reason: NackReason, interest: Interest) -> Self {
        Self {
            reason,
            interest: Some(interest),
        }
    }

    /// Create a Nack that does not carry the rejected Interest.
    pub fn without_interest(reason: NackReason) -> Self {
        Self {
            reason,
            interest: None,
        }
    }

    /// Reason code.
    pub fn reason(&self) -> NackReason {
        self.reason
    }

    /// Rejected Interest, when the link packet carried it.
    pub fn interest(&self) -> Option<&Interest> {
        self.interest.as_ref()
    }

    fn header_len(&self) -> usize {
        self.reason
            .code()
            .map_or(0, |code| tlv_size(TT_LP_NACK_REASON, nonneg_size(code)))
    }

    fn value_len(&self) -> usize {
        tlv_size(TT_LP_NACK, self.header_len())
            + self
                .interest
                .as_ref()
                .map_or(0, |i| tlv_size(TT_LP_FRAGMENT, i.encoded_len()))
    }

    /// Encoded size of the whole link packet.
    pub fn encoded_len(&self) -> usize {
        tlv_size(TT_LP_PACKET, self.value_len())
    }

    /// Write the Nack as an LpPacket.
    pub fn encode(&self, w: &mut TlvWriter<'_>) -> Result<(), EncodeError> {
        w.reserve(self.encoded_len())?;
        w.put_header(TT_LP_PACKET, self.value_len())?;
        w.put_header(TT_LP_NACK, self.header_len())?;
        if let Some(code) = self.reason.code() {
            w.put_nonneg_tlv(TT_LP_NACK_REASON, code)?;
        }
        if let Some(interest) = &self.interest {
            w.put_header(TT_LP_FRAGMENT, interest.encoded_len())?;
            interest.encode(w)?;
        }
        Ok(())
    }

    /// Decode the Nack header value together with an optional fragment.
    pub(super) fn decode(header: &[u8], fragment: Option<&[u8]>) -> Result<Self, DecodeError> {
        let mut reason = NackReason::None;
        let mut r = TlvReader::new(header);
        while !r.is_empty() {
            let (tlv_type, v) = r.read_tlv()?;
            if tlv_type == TT_LP_NACK_REASON {
                reason = NackReason::from_code(decode_nonneg(v)?);
            }
        }

        let interest = match fragment {
            Some(frag) => Some(Interest::decode(TlvReader::new(frag).expect(TT_INTEREST)?)?),
            None => None,
        };
        Ok(Self { reason, interest })
    }
}
