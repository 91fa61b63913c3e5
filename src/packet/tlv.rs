//! TLV primitives: VAR-NUMBER, NonNegativeInteger, reader and writer.
//!
//! Wire format of one element:
//! ```text
//! +-------------+---------------+----------------+
//! | TLV-TYPE    | TLV-LENGTH    | TLV-VALUE      |
//! | var-number  | var-number    | LENGTH octets  |
//! +-------------+---------------+----------------+
//! ```
//! A VAR-NUMBER is one octet below 253, otherwise a marker (253, 254, 255)
//! followed by a 2, 4 or 8 octet big-endian integer.

use crate::core::{DecodeError, EncodeError};

/// Encoded size of a VAR-NUMBER.
pub fn var_number_size(n: u64) -> usize {
    if n < 253 {
        1
    } else if n <= u16::MAX as u64 {
        3
    } else if n <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Encoded size of a NonNegativeInteger.
pub fn nonneg_size(n: u64) -> usize {
    if n <= u8::MAX as u64 {
        1
    } else if n <= u16::MAX as u64 {
        2
    } else if n <= u32::MAX as u64 {
        4
    } else {
        8
    }
}

/// Encoded size of a whole element with a `len` octet value.
pub fn tlv_size(tlv_type: u64, len: usize) -> usize {
    var_number_size(tlv_type) + var_number_size(len as u64) + len
}

/// Whether an unrecognized element of this type must abort decoding.
pub fn is_critical(tlv_type: u64) -> bool {
    tlv_type < 32 || tlv_type & 1 == 1
}

/// Decode a NonNegativeInteger value.
pub fn decode_nonneg(value: &[u8]) -> Result<u64, DecodeError> {
    match value.len() {
        1 => Ok(value[0] as u64),
        2 => Ok(u16::from_be_bytes([value[0], value[1]]) as u64),
        4 => Ok(u32::from_be_bytes([value[0], value[1], value[2], value[3]]) as u64),
        8 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(value);
            Ok(u64::from_be_bytes(bytes))
        }
        n => Err(DecodeError::InvalidInteger(n)),
    }
}

/// Write a NonNegativeInteger in minimal length into `out`.
///
/// Returns the number of octets written; `out` must hold at least 8.
pub fn encode_nonneg(n: u64, out: &mut [u8]) -> usize {
    let size = nonneg_size(n);
    out[..size].copy_from_slice(&n.to_be_bytes()[8 - size..]);
    size
}

/// Cursor over a TLV-encoded buffer.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TlvReader<'a> {
    /// Create a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Whether all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::UnexpectedEof)?;
        if end > self.buf.len() {
            return Err(DecodeError::UnexpectedEof);
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Read one VAR-NUMBER.
    pub fn read_var_number(&mut self) -> Result<u64, DecodeError> {
        let first = self.take(1)?[0];
        let n = match first {
            0..=252 => return Ok(first as u64),
            253 => {
                let b = self.take(2)?;
                u16::from_be_bytes([b[0], b[1]]) as u64
            }
            254 => {
                let b = self.take(4)?;
                u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as u64
            }
            255 => {
                let b = self.take(8)?;
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(b);
                u64::from_be_bytes(bytes)
            }
        };
        Ok(n)
    }

    /// Read one element, returning its type and value.
    pub fn read_tlv(&mut self) -> Result<(u64, &'a [u8]), DecodeError> {
        let tlv_type = self.read_var_number()?;
        let len = self.read_var_number()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::UnexpectedEof)?;
        let value = self.take(len)?;
        Ok((tlv_type, value))
    }

    /// Read one element that must have type `expected`.
    pub fn expect(&mut self, expected: u64) -> Result<&'a [u8], DecodeError> {
        let (actual, value) = self.read_tlv()?;
        if actual != expected {
            return Err(DecodeError::UnexpectedType { expected, actual });
        }
        Ok(value)
    }
}

/// Writer into a caller-provided fixed buffer.
#[derive(Debug)]
pub struct TlvWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> TlvWriter<'a> {
    /// Create a writer at the start of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Octets written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Written octets.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Fail early if `needed` more octets do not fit.
    pub fn reserve(&self, needed: usize) -> Result<(), EncodeError> {
        let available = self.buf.len() - self.len;
        if needed > available {
            return Err(EncodeError::BufferTooSmall { needed, available });
        }
        Ok(())
    }

    /// Append raw octets.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.reserve(bytes.len())?;
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Append a VAR-NUMBER.
    pub fn put_var_number(&mut self, n: u64) -> Result<(), EncodeError> {
        if n < 253 {
            self.put_bytes(&[n as u8])
        } else if n <= u16::MAX as u64 {
            self.put_bytes(&[253])?;
            self.put_bytes(&(n as u16).to_be_bytes())
        } else if n <= u32::MAX as u64 {
            self.put_bytes(&[254])?;
            self.put_bytes(&(n as u32).to_be_bytes())
        } else {
            self.put_bytes(&[255])?;
            self.put_bytes(&n.to_be_bytes())
        }
    }

    /// Append a type and length; the caller writes `len` value octets next.
    pub fn put_header(&mut self, tlv_type: u64, len: usize) -> Result<(), EncodeError> {
        self.reserve(tlv_size(tlv_type, len))?;
        self.put_var_number(tlv_type)?;
        self.put_var_number(len as u64)
    }

    /// Append a whole element.
    pub fn put_tlv(&mut self, tlv_type: u64, value: &[u8]) -> Result<(), EncodeError> {
        self.put_header(tlv_type, value.len())?;
        self.put_bytes(value)
    }

    /// Append an element holding a NonNegativeInteger.
    pub fn put_nonneg_tlv(&mut self, tlv_type: u64, n: u64) -> Result<(), EncodeError> {
        let mut scratch = [0u8; 8];
        let size = encode_nonneg(n, &mut scratch);
        self.put_tlv(tlv_type, &scratch[..size])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_number_boundaries() {
        let mut buf = [0u8; 32];
        let mut w = TlvWriter::new(&mut buf);
        for n in [0u64, 252, 253, 65535, 65536, u32::MAX as u64, u64::MAX] {
            w.put_var_number(n).unwrap();
        }
        assert_eq!(w.len(), 1 + 1 + 3 + 3 + 5 + 5 + 9);
        let written = w.written().to_vec();

        let mut r = TlvReader::new(&written);
        for n in [0u64, 252, 253, 65535, 65536, u32::MAX as u64, u64::MAX] {
            assert_eq!(r.read_var_number().unwrap(), n);
        }
        assert!(r.is_empty());
    }

    #[test]
    fn test_nonneg_minimal_length() {
        let mut out = [0u8; 8];
        assert_eq!(encode_nonneg(0, &mut out), 1);
        assert_eq!(encode_nonneg(256, &mut out), 2);
        assert_eq!(&out[..2], &[0x01, 0x00]);
        assert_eq!(encode_nonneg(70000, &mut out), 4);
        assert_eq!(encode_nonneg(1 << 40, &mut out), 8);
        assert_eq!(decode_nonneg(&out[..8]).unwrap(), 1 << 40);
        assert_eq!(decode_nonneg(&[1, 2, 3]), Err(DecodeError::InvalidInteger(3)));
    }

    #[test]
    fn test_read_tlv_truncated() {
        let mut r = TlvReader::new(&[0x07, 0x05, 0x08, 0x01]);
        assert_eq!(r.read_tlv(), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_expect_type_mismatch() {
        let mut r = TlvReader::new(&[0x06, 0x00]);
        assert_eq!(
            r.expect(0x05),
            Err(DecodeError::UnexpectedType {
                expected: 0x05,
                actual: 0x06
            })
        );
    }

    #[test]
    fn test_writer_overflow() {
        let mut buf = [0u8; 3];
        let mut w = TlvWriter::new(&mut buf);
        let err = w.put_tlv(0x15, &[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            EncodeError::BufferTooSmall {
                needed: 5,
                available: 3
            }
        );
        assert!(w.is_empty());
    }

    #[test]
    fn test_critical_types() {
        assert!(is_critical(0x07));
        assert!(is_critical(0x0321));
        assert!(!is_critical(0x0320));
        assert!(!is_critical(0x22));
    }
}
