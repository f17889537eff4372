//! Canonical Huffman decoding.
//!
//! The compressed stream begins with one code-length byte per symbol of the
//! alphabet (0 = unused), followed by the MSB-first code stream. Codes are
//! canonical: assigned shortest-first, and codes of equal length are
//! enumerated in ascending symbol order, so the lowest symbol value wins
//! ties. Any reimplementation must tie-break identically or decoded output
//! diverges byte-for-byte.

use crate::exhausted_at;
use vnex_core::error::{Result, VnexError};
use vnex_core::stream::{BitOrder, MemoryStream};

/// Maximum code length in bits.
pub const MAX_CODE_LENGTH: usize = 15;

/// Alphabet size for plain byte streams.
pub const BYTE_ALPHABET: usize = 256;

/// A canonical prefix-code table built from per-symbol code lengths.
///
/// Shared between the plain Huffman decoder and the Nemesis decoder's
/// literal/length alphabet.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    /// Number of codes of each length.
    counts: [u32; MAX_CODE_LENGTH + 1],
    /// First canonical code of each length.
    first_codes: [u32; MAX_CODE_LENGTH + 1],
    /// Start of each length's run in `symbols`.
    offsets: [u32; MAX_CODE_LENGTH + 1],
    /// Symbols ordered by (length, symbol value).
    symbols: Vec<u16>,
    max_length: usize,
}

impl CanonicalTable {
    /// Build a table from code lengths; `lengths[i]` is the bit length of
    /// symbol `i`, zero meaning unused.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut counts = [0u32; MAX_CODE_LENGTH + 1];
        let mut max_length = 0usize;
        for &len in lengths {
            let len = len as usize;
            if len == 0 {
                continue;
            }
            if len > MAX_CODE_LENGTH {
                return Err(VnexError::corrupt(
                    0,
                    format!("code length {len} exceeds maximum {MAX_CODE_LENGTH}"),
                ));
            }
            counts[len] += 1;
            max_length = max_length.max(len);
        }
        if max_length == 0 {
            return Err(VnexError::corrupt(0, "code length set is empty"));
        }

        // Kraft inequality: an over-subscribed set cannot be a prefix code.
        let mut space = 0u64;
        for len in 1..=max_length {
            space += (counts[len] as u64) << (max_length - len);
        }
        if space > 1u64 << max_length {
            return Err(VnexError::corrupt(0, "over-subscribed code length set"));
        }

        let mut first_codes = [0u32; MAX_CODE_LENGTH + 1];
        let mut offsets = [0u32; MAX_CODE_LENGTH + 1];
        let mut code = 0u32;
        let mut offset = 0u32;
        for len in 1..=max_length {
            code = (code + counts[len - 1]) << 1;
            first_codes[len] = code;
            offsets[len] = offset;
            offset += counts[len];
        }

        // Ascending symbol order within each length gives the canonical
        // tie-break for free.
        let mut next = offsets;
        let mut symbols = vec![0u16; offset as usize];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len > 0 {
                let len = len as usize;
                symbols[next[len] as usize] = symbol as u16;
                next[len] += 1;
            }
        }

        Ok(Self {
            counts,
            first_codes,
            offsets,
            symbols,
            max_length,
        })
    }

    /// Decode one symbol from an MSB-first bit stream.
    pub fn decode_symbol(&self, stream: &mut MemoryStream<'_>) -> Result<u16> {
        let mut code = 0u32;
        for len in 1..=self.max_length {
            code = (code << 1) | stream.read_bit()? as u32;
            let index = code.wrapping_sub(self.first_codes[len]);
            if index < self.counts[len] {
                return Ok(self.symbols[(self.offsets[len] + index) as usize]);
            }
        }
        Err(VnexError::invalid_huffman(stream.bit_tell()))
    }
}

/// Canonical Huffman decoder over the 256-symbol byte alphabet.
///
/// The code table is built lazily on the first non-empty decode, so an
/// empty input decoded to target length zero succeeds with zero bytes.
#[derive(Debug, Default)]
pub struct HuffmanDecoder {
    input: Vec<u8>,
    /// Bit cursor into `input`, persisted across decode calls.
    cursor: u64,
    table: Option<CanonicalTable>,
}

impl HuffmanDecoder {
    /// Create a decoder with no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new compressed buffer and reset the session.
    pub fn set_input(&mut self, input: Vec<u8>) {
        self.input = input;
        self.cursor = 0;
        self.table = None;
    }

    /// Produce exactly `target_length` decoded bytes.
    pub fn decode(&mut self, target_length: usize) -> Result<Vec<u8>> {
        self.decode_inner(target_length).map_err(|err| match err {
            VnexError::UnexpectedEof { .. } => exhausted_at(self.cursor),
            other => other,
        })
    }

    fn decode_inner(&mut self, target_length: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(target_length);
        if target_length == 0 {
            return Ok(output);
        }
        if self.table.is_none() {
            if self.input.len() < BYTE_ALPHABET {
                return Err(VnexError::corrupt(
                    0,
                    "input shorter than the code length table",
                ));
            }
            self.table = Some(CanonicalTable::from_lengths(&self.input[..BYTE_ALPHABET])?);
            self.cursor = (BYTE_ALPHABET as u64) * 8;
        }
        let table = self.table.as_ref().unwrap();

        let mut stream = MemoryStream::with_bit_order(&self.input, BitOrder::MsbFirst);
        stream.bit_seek(self.cursor);
        while output.len() < target_length {
            output.push(table.decode_symbol(&mut stream)? as u8);
        }
        self.cursor = stream.bit_tell();
        Ok(output)
    }
}
