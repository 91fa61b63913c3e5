//! Interest packets.
//!
//! Only the fields a reachability probe needs are modelled; other
//! recognized elements are skipped on decode.

use crate::core::constants::{
    DEFAULT_INTEREST_LIFETIME_MS, TT_CAN_BE_PREFIX, TT_FORWARDING_HINT, TT_INTEREST,
    TT_INTEREST_LIFETIME, TT_MUST_BE_FRESH, TT_NAME, TT_NONCE,
};
use crate::core::{DecodeError, EncodeError};

use super::name::Name;
use super::tlv::{decode_nonneg, is_critical, nonneg_size, tlv_size, TlvReader, TlvWriter};

/// An Interest: a named request with a bounded lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    can_be_prefix: bool,
    must_be_fresh: bool,
    nonce: Option<u32>,
    lifetime_ms: u32,
}

impl Interest {
    /// Create an Interest with default lifetime and no selectors.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            nonce: None,
            lifetime_ms: DEFAULT_INTEREST_LIFETIME_MS,
        }
    }

    /// Set the MustBeFresh flag.
    pub fn with_must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    /// Set the CanBePrefix flag.
    pub fn with_can_be_prefix(mut self, can_be_prefix: bool) -> Self {
        self.can_be_prefix = can_be_prefix;
        self
    }

    /// Set the InterestLifetime.
    pub fn with_lifetime(mut self, lifetime_ms: u32) -> Self {
        self.lifetime_ms = lifetime_ms;
        self
    }

    /// Fix the nonce instead of drawing a fresh one per encoding.
    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Mutable name.
    pub fn name_mut(&mut self) -> &mut Name {
        &mut self.name
    }

    /// MustBeFresh flag.
    pub fn must_be_fresh(&self) -> bool {
        self.must_be_fresh
    }

    /// CanBePrefix flag.
    pub fn can_be_prefix(&self) -> bool {
        self.can_be_prefix
    }

    /// InterestLifetime in milliseconds.
    pub fn lifetime_ms(&self) -> u32 {
        self.lifetime_ms
    }

    /// Nonce, if fixed or decoded.
    pub fn nonce(&self) -> Option<u32> {
        self.nonce
    }

    fn value_len(&self) -> usize {
        let mut len = self.name.encoded_len() + tlv_size(TT_NONCE, 4);
        if self.can_be_prefix {
            len += tlv_size(TT_CAN_BE_PREFIX, 0);
        }
        if self.must_be_fresh {
            len += tlv_size(TT_MUST_BE_FRESH, 0);
        }
        if self.lifetime_ms != DEFAULT_INTEREST_LIFETIME_MS {
            len += tlv_size(TT_INTEREST_LIFETIME, nonneg_size(self.lifetime_ms as u64));
        }
        len
    }

    /// Encoded size of the whole packet.
    pub fn encoded_len(&self) -> usize {
        tlv_size(TT_INTEREST, self.value_len())
    }

    /// Write the Interest. A random nonce is used unless one was fixed.
    pub fn encode(&self, w: &mut TlvWriter<'_>) -> Result<(), EncodeError> {
        w.reserve(self.encoded_len())?;
        w.put_header(TT_INTEREST, self.value_len())?;
        self.name.encode(w)?;
        if self.can_be_prefix {
            w.put_tlv(TT_CAN_BE_PREFIX, &[])?;
        }
        if self.must_be_fresh {
            w.put_tlv(TT_MUST_BE_FRESH, &[])?;
        }
        let nonce = self.nonce.unwrap_or_else(rand::random);
        w.put_tlv(TT_NONCE, &nonce.to_be_bytes())?;
        if self.lifetime_ms != DEFAULT_INTEREST_LIFETIME_MS {
            w.put_nonneg_tlv(TT_INTEREST_LIFETIME, self.lifetime_ms as u64)?;
        }
        Ok(())
    }

    /// Decode an Interest TLV-VALUE.
    pub fn decode(value: &[u8]) -> Result<Self, DecodeError> {
        let mut r = TlvReader::new(value);
        let name = Name::decode(r.expect(TT_NAME)?)?;
        let mut interest = Self::new(name);
        while !r.is_empty() {
            let (tlv_type, v) = r.read_tlv()?;
            match tlv_type {
                TT_CAN_BE_PREFIX => interest.can_be_prefix = true,
                TT_MUST_BE_FRESH => interest.must_be_fresh = true,
                TT_NONCE => {
                    let bytes: [u8; 4] = v.try_into().map_err(|_| DecodeError::UnexpectedEof)?;
                    interest.nonce = Some(u32::from_be_bytes(bytes));
                }
                TT_INTEREST_LIFETIME => {
                    interest.lifetime_ms = u32::try_from(decode_nonneg(v)?).unwrap_or(u32::MAX);
                }
                TT_FORWARDING_HINT => {}
                t if is_critical(t) => return Err(DecodeError::UnrecognizedCritical(t)),
                _ => {}
            }
        }
        Ok(interest)
    }
}
