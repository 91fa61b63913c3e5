//! Data packets.
//!
//! Encoding signs with DigestSha256 so the packet is well-formed for any
//! forwarder; decoding does not verify signatures.

use heapless::Vec as HVec;
use sha2::{Digest, Sha256};

use crate::core::constants::{
    MAX_CONTENT_SIZE, SIGNATURE_DIGEST_SHA256, TT_CONTENT, TT_DATA, TT_FRESHNESS_PERIOD,
    TT_META_INFO, TT_NAME, TT_SIGNATURE_INFO, TT_SIGNATURE_TYPE, TT_SIGNATURE_VALUE,
};
use crate::core::{DecodeError, EncodeError};

use super::name::Name;
use super::tlv::{decode_nonneg, is_critical, nonneg_size, tlv_size, TlvReader, TlvWriter};

const DIGEST_SIZE: usize = 32;

/// A Data packet: a named reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    freshness_period_ms: Option<u32>,
    content: HVec<u8, MAX_CONTENT_SIZE>,
}

impl Data {
    /// Create an empty Data packet.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            freshness_period_ms: None,
            content: HVec::new(),
        }
    }

    /// Set the content.
    pub fn with_content(mut self, content: &[u8]) -> Result<Self, DecodeError> {
        self.content =
            HVec::from_slice(content).map_err(|_| DecodeError::CapacityExceeded("content"))?;
        Ok(self)
    }

    /// Set the FreshnessPeriod.
    pub fn with_freshness_period(mut self, ms: u32) -> Self {
        self.freshness_period_ms = Some(ms);
        self
    }

    /// Name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// FreshnessPeriod, if present.
    pub fn freshness_period_ms(&self) -> Option<u32> {
        self.freshness_period_ms
    }

    fn meta_info_len(&self) -> Option<usize> {
        self.freshness_period_ms
            .map(|ms| tlv_size(TT_FRESHNESS_PERIOD, nonneg_size(ms as u64)))
    }

    fn signature_info_len() -> usize {
        tlv_size(TT_SIGNATURE_TYPE, nonneg_size(SIGNATURE_DIGEST_SHA256))
    }

    fn value_len(&self) -> usize {
        self.name.encoded_len()
            + self
                .meta_info_len()
                .map_or(0, |len| tlv_size(TT_META_INFO, len))
            + tlv_size(TT_CONTENT, self.content.len())
            + tlv_size(TT_SIGNATURE_INFO, Self::signature_info_len())
            + tlv_size(TT_SIGNATURE_VALUE, DIGEST_SIZE)
    }

    /// Encoded size of the whole packet.
    pub fn encoded_len(&self) -> usize {
        tlv_size(TT_DATA, self.value_len())
    }

    /// Write the Data packet with a DigestSha256 signature.
    pub fn encode(&self, w: &mut TlvWriter<'_>) -> Result<(), EncodeError> {
        w.reserve(self.encoded_len())?;
        w.put_header(TT_DATA, self.value_len())?;
        let signed_start = w.len();

        self.name.encode(w)?;
        if let (Some(ms), Some(len)) = (self.freshness_period_ms, self.meta_info_len()) {
            w.put_header(TT_META_INFO, len)?;
            w.put_nonneg_tlv(TT_FRESHNESS_PERIOD, ms as u64)?;
        }
        w.put_tlv(TT_CONTENT, &self.content)?;
        w.put_header(TT_SIGNATURE_INFO, Self::signature_info_len())?;
        w.put_nonneg_tlv(TT_SIGNATURE_TYPE, SIGNATURE_DIGEST_SHA256)?;

        let digest = Sha256::digest(&w.written()[signed_start..]);
        w.put_tlv(TT_SIGNATURE_VALUE, digest.as_slice())
    }

    /// Decode a Data TLV-VALUE.
    pub fn decode(value: &[u8]) -> Result<Self, DecodeError> {
        let mut r = TlvReader::new(value);
        let name = Name::decode(r.expect(TT_NAME)?)?;
        let mut data = Self::new(name);
        while !r.is_empty() {
            let (tlv_type, v) = r.read_tlv()?;
            match tlv_type {
                TT_META_INFO => data.freshness_period_ms = decode_freshness(v)?,
                TT_CONTENT => {
                    data.content = HVec::from_slice(v)
                        .map_err(|_| DecodeError::CapacityExceeded("content"))?;
                }
                TT_SIGNATURE_INFO | TT_SIGNATURE_VALUE => {}
                t if is_critical(t) => return Err(DecodeError::UnrecognizedCritical(t)),
                _ => {}
            }
        }
        Ok(data)
    }
}

fn decode_freshness(meta_info: &[u8]) -> Result<Option<u32>, DecodeError> {
    let mut r = TlvReader::new(meta_info);
    let mut freshness = None;
    while !r.is_empty() {
        let (tlv_type, v) = r.read_tlv()?;
        if tlv_type == TT_FRESHNESS_PERIOD {
            freshness = Some(u32::try_from(decode_nonneg(v)?).unwrap_or(u32::MAX));
        }
    }
    Ok(freshness)
}
