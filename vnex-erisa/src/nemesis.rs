//! Nemesis LZ dictionary decoding.
//!
//! Each decoded unit is either a literal byte or a (distance, length)
//! back-reference into a sliding window of previously emitted bytes.
//! Literals and match lengths share one canonical Huffman alphabet of 288
//! symbols: 0..=255 are literal bytes, 256..=287 encode a match of length
//! `3 + (symbol - 256)`. The match distance follows as an Elias-gamma
//! value. The stream therefore begins with 288 code-length bytes, reusing
//! the canonical table construction from [`crate::huffman`].
//!
//! A back-reference reaching before the start of the dictionary is corrupt
//! data, never a clamp.

use crate::exhausted_at;
use crate::gamma::read_gamma;
use crate::huffman::CanonicalTable;
use vnex_core::error::{Result, VnexError};
use vnex_core::stream::{BitOrder, MemoryStream};

/// Alphabet size: 256 literals plus 32 match-length symbols.
pub const ALPHABET: usize = 288;

/// First match-length symbol.
const MATCH_BASE: u16 = 256;

/// Minimum match length.
const MIN_MATCH: usize = 3;

/// Sliding-window size in bytes.
pub const WINDOW_SIZE: usize = 0x10000;

/// Nemesis LZ decoder.
#[derive(Debug, Default)]
pub struct NemesisDecoder {
    input: Vec<u8>,
    /// Bit cursor into `input`, persisted across decode calls.
    cursor: u64,
    table: Option<CanonicalTable>,
    /// Recently emitted bytes, trimmed to `WINDOW_SIZE`.
    window: Vec<u8>,
    /// Match suspended at a target-length boundary: (distance, bytes left).
    pending: Option<(usize, usize)>,
}

impl NemesisDecoder {
    /// Create a decoder with no input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new compressed buffer and reset the session.
    pub fn set_input(&mut self, input: Vec<u8>) {
        self.input = input;
        self.cursor = 0;
        self.table = None;
        self.window.clear();
        self.pending = None;
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
            if self.input.len() < ALPHABET {
                return Err(VnexError::corrupt(
                    0,
                    "input shorter than the code length table",
                ));
            }
            self.table = Some(CanonicalTable::from_lengths(&self.input[..ALPHABET])?);
            self.cursor = (ALPHABET as u64) * 8;
        }

        let mut stream = MemoryStream::with_bit_order(&self.input, BitOrder::MsbFirst);
        stream.bit_seek(self.cursor);

        while output.len() < target_length {
            if let Some((distance, left)) = self.pending {
                let take = left.min(target_length - output.len());
                for _ in 0..take {
                    // Overlapping copies must proceed byte-serially.
                    let byte = self.window[self.window.len() - distance];
                    self.window.push(byte);
                    output.push(byte);
                }
                self.pending = (left > take).then_some((distance, left - take));
                Self::trim_window(&mut self.window);
                continue;
            }

            let symbol = self.table.as_ref().unwrap().decode_symbol(&mut stream)?;
            if symbol < MATCH_BASE {
                self.window.push(symbol as u8);
                output.push(symbol as u8);
            } else {
                let length = MIN_MATCH + (symbol - MATCH_BASE) as usize;
                let distance = read_gamma(&mut stream)? as usize;
                if distance > self.window.len() || distance > WINDOW_SIZE {
                    return Err(VnexError::corrupt(
                        stream.bit_tell() / 8,
                        format!(
                            "back-reference distance {distance} exceeds {} bytes of history",
                            self.window.len()
                        ),
                    ));
                }
                self.pending = Some((distance, length));
            }
            Self::trim_window(&mut self.window);
        }

        self.cursor = stream.bit_tell();
        Ok(output)
    }

    /// Amortized trim: let the window grow to twice the nominal size, then
    /// cut it back in one move. Distances stay valid because they are
    /// relative to the window's end.
    fn trim_window(window: &mut Vec<u8>) {
        if window.len() > 2 * WINDOW_SIZE {
            let excess = window.len() - WINDOW_SIZE;
            window.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::BitSink;

    /// Build an input whose table assigns 2-bit codes to `symbols`
    /// (ascending order required), then append the given code stream.
    fn input_with_table(symbols: &[u16], sink: BitSink) -> Vec<u8> {
        assert!(symbols.len() <= 4);
        let mut input = vec![0u8; ALPHABET];
        for &s in symbols {
            input[s as usize] = 2;
        }
        input.extend_from_slice(&sink.into_bytes());
        input
    }

    /// Canonical 2-bit code for the i-th (ascending) symbol.
    fn push_code(sink: &mut BitSink, index: u64) {
        sink.push_bits(index, 2);
    }

    #[test]
    fn test_literals_only() {
        let mut sink = BitSink::default();
        for i in [0u64, 1, 2, 0] {
            push_code(&mut sink, i);
        }
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'a' as u16, b'b' as u16, b'c' as u16], sink));
        assert_eq!(decoder.decode(4).unwrap(), b"abca");
    }

    #[test]
    fn test_back_reference_copy() {
        // "abc" then a match (length 3, distance 3) gives "abcabc".
        let mut sink = BitSink::default();
        push_code(&mut sink, 0); // 'a'
        push_code(&mut sink, 1); // 'b'
        push_code(&mut sink, 2); // 'c'
        push_code(&mut sink, 3); // symbol 256 -> length 3
        sink.push_gamma(3); // distance 3
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(
            &[b'a' as u16, b'b' as u16, b'c' as u16, MATCH_BASE],
            sink,
        ));
        assert_eq!(decoder.decode(6).unwrap(), b"abcabc");
    }

    #[test]
    fn test_overlapping_copy_repeats() {
        // One literal and a match with distance 1 smears the byte forward.
        let mut sink = BitSink::default();
        push_code(&mut sink, 0); // 'x'
        push_code(&mut sink, 1); // symbol 257 -> length 4
        sink.push_gamma(1); // distance 1
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'x' as u16, MATCH_BASE + 1], sink));
        assert_eq!(decoder.decode(5).unwrap(), b"xxxxx");
    }

    #[test]
    fn test_match_suspends_at_target_boundary() {
        let mut sink = BitSink::default();
        push_code(&mut sink, 0); // 'q'
        push_code(&mut sink, 1); // length 5
        sink.push_gamma(1);
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'q' as u16, MATCH_BASE + 2], sink));
        assert_eq!(decoder.decode(3).unwrap(), b"qqq");
        assert_eq!(decoder.decode(3).unwrap(), b"qqq");
    }

    #[test]
    fn test_distance_before_dictionary_start_is_corrupt() {
        // A match before any literal has zero bytes of history.
        let mut sink = BitSink::default();
        push_code(&mut sink, 1); // symbol 256 -> match
        sink.push_gamma(1); // distance 1 > history 0
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'a' as u16, MATCH_BASE], sink));
        let err = decoder.decode(3).unwrap_err();
        assert!(matches!(err, VnexError::CorruptData { .. }));

        // Distance larger than the bytes emitted so far fails the same way.
        let mut sink = BitSink::default();
        push_code(&mut sink, 0); // 'a'
        push_code(&mut sink, 1);
        sink.push_gamma(2); // distance 2 > history 1
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'a' as u16, MATCH_BASE], sink));
        assert!(matches!(
            decoder.decode(4).unwrap_err(),
            VnexError::CorruptData { .. }
        ));
    }

    #[test]
    fn test_exhausted_input_is_corrupt() {
        let mut sink = BitSink::default();
        push_code(&mut sink, 0);
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(input_with_table(&[b'a' as u16], sink));
        assert!(matches!(
            decoder.decode(64).unwrap_err(),
            VnexError::CorruptData { .. }
        ));
    }

    #[test]
    fn test_target_zero() {
        let mut decoder = NemesisDecoder::new();
        decoder.set_input(Vec::new());
        assert_eq!(decoder.decode(0).unwrap(), Vec::<u8>::new());
    }
}
