//! Bounds-checked little-endian reads over a borrowed byte range.
//!
//! Every read is checked against the buffer length and fails closed with
//! [`Error::Corrupt`] rather than panicking or reading garbage.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// A read-only view over an LLTZ index's bytes.
#[derive(Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> ByteReader<'a> {
        ByteReader { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(Error::Corrupt { offset, len })?;
        self.bytes
            .get(offset..end)
            .ok_or(Error::Corrupt { offset, len })
    }

    pub fn u8(&self, offset: usize) -> Result<u8> {
        self.slice(offset, 1).map(|s| s[0])
    }

    pub fn u16(&self, offset: usize) -> Result<u16> {
        self.slice(offset, 2).map(LittleEndian::read_u16)
    }

    pub fn u32(&self, offset: usize) -> Result<u32> {
        self.slice(offset, 4).map(LittleEndian::read_u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let r = ByteReader::new(&bytes);
        assert_eq!(r.u8(0).unwrap(), 0x01);
        assert_eq!(r.u16(0).unwrap(), 0x0201);
        assert_eq!(r.u32(0).unwrap(), 0x04030201);
        assert_eq!(r.u16(4).unwrap(), 0x0605);
    }

    #[test]
    fn out_of_range_reads_fail_closed() {
        let bytes = [0u8; 3];
        let r = ByteReader::new(&bytes);
        assert!(r.u32(0).is_err());
        assert!(r.u16(2).is_err());
        assert!(r.u8(3).is_err());
    }
}
