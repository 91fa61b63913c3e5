//! Names and name components.

use std::fmt;

use heapless::Vec as HVec;

use crate::core::constants::{
    MAX_COMPONENT_SIZE, MAX_NAME_COMPONENTS, TT_GENERIC_NAME_COMPONENT, TT_NAME,
};
use crate::core::{DecodeError, EncodeError};

use super::sequence::{decode_sequence, encode_sequence, SequenceBuf};
use super::tlv::{tlv_size, TlvReader, TlvWriter};

/// One typed name component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    tlv_type: u64,
    value: HVec<u8, MAX_COMPONENT_SIZE>,
}

impl Component {
    /// Create a component of the given type.
    pub fn new(tlv_type: u64, value: &[u8]) -> Result<Self, DecodeError> {
        let value = HVec::from_slice(value)
            .map_err(|_| DecodeError::CapacityExceeded("name component"))?;
        Ok(Self { tlv_type, value })
    }

    /// Create a generic component.
    pub fn generic(value: &[u8]) -> Result<Self, DecodeError> {
        Self::new(TT_GENERIC_NAME_COMPONENT, value)
    }

    /// Create a generic component holding an encoded sequence number.
    pub fn from_sequence_number(seq: u64) -> Result<Self, EncodeError> {
        let mut buf: SequenceBuf = Default::default();
        let mut component = Self {
            tlv_type: TT_GENERIC_NAME_COMPONENT,
            value: HVec::new(),
        };
        component.set_sequence_number(seq, &mut buf)?;
        Ok(component)
    }

    /// Overwrite this component with `seq`, staging the bytes in `scratch`.
    ///
    /// On error the component is left unchanged.
    pub fn set_sequence_number(&mut self, seq: u64, scratch: &mut [u8]) -> Result<(), EncodeError> {
        let len = encode_sequence(seq, scratch)?;
        let value = HVec::from_slice(&scratch[..len]).map_err(|_| EncodeError::BufferTooSmall {
            needed: len,
            available: MAX_COMPONENT_SIZE,
        })?;
        self.tlv_type = TT_GENERIC_NAME_COMPONENT;
        self.value = value;
        Ok(())
    }

    /// Decode this component as a sequence number.
    pub fn to_sequence_number(&self) -> Result<u64, DecodeError> {
        decode_sequence(&self.value)
    }

    /// TLV type.
    pub fn tlv_type(&self) -> u64 {
        self.tlv_type
    }

    /// Component value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    fn encoded_len(&self) -> usize {
        tlv_size(self.tlv_type, self.value.len())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tlv_type != TT_GENERIC_NAME_COMPONENT {
            write!(f, "{}=", self.tlv_type)?;
        }
        for &b in self.value.iter() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{b:02X}")?;
            }
        }
        Ok(())
    }
}

/// Hierarchical name with a fixed component capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    components: HVec<Component, MAX_NAME_COMPONENTS>,
}

impl Name {
    /// Create an empty name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URI such as `/ndn/edu/ping` into generic components.
    pub fn from_uri(uri: &str) -> Result<Self, DecodeError> {
        let mut name = Self::new();
        for part in uri.split('/').filter(|p| !p.is_empty()) {
            name.push(Component::generic(part.as_bytes())?)?;
        }
        Ok(name)
    }

    /// Append a component.
    pub fn push(&mut self, component: Component) -> Result<(), DecodeError> {
        self.components
            .push(component)
            .map_err(|_| DecodeError::CapacityExceeded("name components"))
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the name has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether another component fits.
    pub fn has_capacity(&self) -> bool {
        self.components.len() < MAX_NAME_COMPONENTS
    }

    /// Component at `index`.
    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Last component.
    pub fn last(&self) -> Option<&Component> {
        self.components.last()
    }

    /// Mutable last component.
    pub fn last_mut(&mut self) -> Option<&mut Component> {
        self.components.last_mut()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Whether every component of `self` leads `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.len() <= other.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Length of the Name TLV-VALUE.
    pub fn value_len(&self) -> usize {
        self.components.iter().map(Component::encoded_len).sum()
    }

    /// Encoded size of the whole Name element.
    pub fn encoded_len(&self) -> usize {
        tlv_size(TT_NAME, self.value_len())
    }

    /// Write the Name element.
    pub fn encode(&self, w: &mut TlvWriter<'_>) -> Result<(), EncodeError> {
        w.put_header(TT_NAME, self.value_len())?;
        for c in self.components.iter() {
            w.put_tlv(c.tlv_type, &c.value)?;
        }
        Ok(())
    }

    /// Decode a Name TLV-VALUE.
    pub fn decode(value: &[u8]) -> Result<Self, DecodeError> {
        let mut name = Self::new();
        let mut r = TlvReader::new(value);
        while !r.is_empty() {
            let (tlv_type, v) = r.read_tlv()?;
            name.push(Component::new(tlv_type, v)?)?;
        }
        Ok(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("/");
        }
        for c in self.components.iter() {
            write!(f, "/{c}")?;
        }
        Ok(())
    }
}
