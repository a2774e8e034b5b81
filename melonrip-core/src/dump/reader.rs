//! Little-endian cursor over dump bytes.
//!
//! Every read names the record it belongs to so that a short read can be
//! reported as a [`RipError::TruncatedRecord`] for that record.

use crate::error::{RipError, RipResult};

/// Read-only cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct DumpReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DumpReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor starting at `pos`, clamped to the end of `data`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, record: &'static str, len: usize) -> RipResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(RipError::truncated(record, self.pos, len, remaining));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Sub-reader over the next `len` bytes.
    pub fn sub(&mut self, record: &'static str, len: usize) -> RipResult<DumpReader<'a>> {
        self.take(record, len).map(DumpReader::new)
    }

    #[inline]
    fn array<const N: usize>(&mut self, record: &'static str) -> RipResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(record, N)?);
        Ok(buf)
    }

    pub fn read_tag(&mut self) -> RipResult<[u8; 4]> {
        self.array::<4>("opcode")
    }

    pub fn read_u16(&mut self, record: &'static str) -> RipResult<u16> {
        self.array(record).map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self, record: &'static str) -> RipResult<i16> {
        self.array(record).map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self, record: &'static str) -> RipResult<u32> {
        self.array(record).map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self, record: &'static str) -> RipResult<i32> {
        self.array(record).map(i32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF, 0x01, 0x80];
        let mut r = DumpReader::new(&data);
        assert_eq!(r.read_u32("TEST").unwrap(), 0x1234_5678);
        assert_eq!(r.read_i16("TEST").unwrap(), -2);
        assert_eq!(r.read_u16("TEST").unwrap(), 0x8001);
        assert!(r.is_empty());
    }

    #[test]
    fn short_read_reports_offset() {
        let data = [0u8; 6];
        let mut r = DumpReader::new(&data);
        r.read_u32("TPRM").unwrap();
        let err = r.read_u32("TPLT").unwrap_err();
        assert_eq!(
            err,
            RipError::TruncatedRecord {
                record: "TPLT",
                offset: 4,
                needed: 4,
                remaining: 2,
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn at_clamps_to_end() {
        let data = [1u8, 2, 3];
        let r = DumpReader::at(&data, 24);
        assert!(r.is_empty());
    }
}
