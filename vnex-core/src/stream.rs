//! Byte- and bit-granular reading over an in-memory buffer.
//!
//! Every decode operation owns one [`MemoryStream`] per input file. The
//! stream is seekable and endianness-aware at byte granularity, and can also
//! serve single bits in either bit order for variable-length codes.
//!
//! # Bit ordering
//!
//! Entis-family entropy streams pack bits MSB-first within bytes; several
//! other engine formats are LSB-first. The order is configured per stream
//! with [`BitOrder`].
//!
//! # Cursor rules
//!
//! The byte cursor and the bit cursor are one cursor: the byte position is
//! always `floor(bit position / 8)`. Byte-mode reads while the sub-byte bit
//! offset is non-zero are rejected; call [`MemoryStream::align_to_byte`]
//! first. Seeking past the end of the buffer is allowed lazily and only
//! fails on the next read.

use crate::error::{Result, VnexError};

/// Bit packing order within a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Most significant bit first (Entis entropy streams).
    #[default]
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// A seekable reader over a borrowed byte buffer.
///
/// Reading past the end of the buffer fails with
/// [`VnexError::UnexpectedEof`] rather than returning zero-filled data;
/// callers must treat that as corrupt input, not as an end-of-stream signal.
#[derive(Debug, Clone)]
pub struct MemoryStream<'a> {
    data: &'a [u8],
    pos: usize,
    /// Sub-byte bit offset, 0..=7. Zero means byte-aligned.
    bit: u8,
    order: BitOrder,
}

impl<'a> MemoryStream<'a> {
    /// Create a stream over `data` with MSB-first bit order.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit: 0,
            order: BitOrder::MsbFirst,
        }
    }

    /// Create a stream over `data` with an explicit bit order.
    pub fn with_bit_order(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            data,
            pos: 0,
            bit: 0,
            order,
        }
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current byte position.
    pub fn tell(&self) -> u64 {
        self.pos as u64
    }

    /// Bytes remaining until the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Whether the cursor is at or past the end of the buffer.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Seek to an absolute byte offset and realign to a byte boundary.
    ///
    /// Seeking past the end is permitted; the failure surfaces on the next
    /// read instead.
    pub fn seek(&mut self, offset: u64) {
        self.pos = offset as usize;
        self.bit = 0;
    }

    /// Advance the byte cursor by `count` bytes.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.require_aligned()?;
        self.pos += count as usize;
        Ok(())
    }

    fn require_aligned(&self) -> Result<()> {
        if self.bit != 0 {
            return Err(VnexError::corrupt(
                self.tell(),
                "byte read on a bit-shifted stream without realignment",
            ));
        }
        Ok(())
    }

    fn check_available(&self, count: usize) -> Result<()> {
        let end = self.pos.checked_add(count).ok_or_else(|| {
            VnexError::corrupt(self.tell(), "read length overflows the address space")
        })?;
        if end > self.data.len() {
            return Err(VnexError::unexpected_eof(end - self.data.len()));
        }
        Ok(())
    }

    /// Read `count` bytes and advance.
    pub fn read(&mut self, count: usize) -> Result<&'a [u8]> {
        self.require_aligned()?;
        self.check_available(count)?;
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Read `count` bytes without advancing.
    pub fn peek(&self, count: usize) -> Result<&'a [u8]> {
        self.require_aligned()?;
        self.check_available(count)?;
        Ok(&self.data[self.pos..self.pos + count])
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Read a big-endian u16.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let b = self.read(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.read(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian u32.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let b = self.read(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        let b = self.read(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a big-endian u64.
    pub fn read_u64_be(&mut self) -> Result<u64> {
        let b = self.read(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Current position in bits.
    pub fn bit_tell(&self) -> u64 {
        self.pos as u64 * 8 + self.bit as u64
    }

    /// Seek to an absolute bit position.
    ///
    /// Used by entropy decoders to persist their cursor across calls.
    pub fn bit_seek(&mut self, bit_offset: u64) {
        self.pos = (bit_offset / 8) as usize;
        self.bit = (bit_offset % 8) as u8;
    }

    /// Advance to the next byte boundary, discarding partial bits.
    pub fn align_to_byte(&mut self) {
        if self.bit != 0 {
            self.pos += 1;
            self.bit = 0;
        }
    }

    /// Read a single bit in the configured order.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(VnexError::unexpected_eof(1));
        }
        let byte = self.data[self.pos];
        let bit = match self.order {
            BitOrder::MsbFirst => (byte >> (7 - self.bit)) & 1,
            BitOrder::LsbFirst => (byte >> self.bit) & 1,
        };
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Ok(bit)
    }

    /// Read `count` bits (`count <= 64`) in the configured order.
    ///
    /// MSB-first streams return the first bit read in the most significant
    /// position of the result; LSB-first streams return it in the least
    /// significant position.
    pub fn read_bits(&mut self, count: u32) -> Result<u64> {
        debug_assert!(count <= 64, "cannot read more than 64 bits at once");
        let mut value = 0u64;
        for i in 0..count {
            let bit = self.read_bit()? as u64;
            match self.order {
                BitOrder::MsbFirst => value = (value << 1) | bit,
                BitOrder::LsbFirst => value |= bit << i,
            }
        }
        Ok(value)
    }
}
