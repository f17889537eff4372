//! Run-length decoding with Elias-gamma run lengths.
//!
//! The stream alternates control codes and payloads, MSB-first:
//!
//! - `0`  — literal run: gamma length N, then N bytes of 8 bits each
//! - `10` — repeat run: gamma length N, emit the previous byte N times
//! - `11` — escape: align to the next byte boundary, read one count byte C,
//!   then copy C+1 bytes verbatim
//!
//! Gamma codes bias short lengths: k leading zero bits announce a k+1-bit
//! value, so common short runs cost the fewest bits. The "previous byte"
//! carries across `decode` calls within one session and resets only when a
//! new input buffer is set.

use crate::exhausted_at;
use vnex_core::error::{Result, VnexError};
use vnex_core::stream::{BitOrder, MemoryStream};

/// Read one Elias-gamma value (always >= 1).
pub(crate) fn read_gamma(stream: &mut MemoryStream<'_>) -> Result<u64> {
    let mut zeros = 0u32;
    while stream.read_bit()? == 0 {
        zeros += 1;
        if zeros > 32 {
            return Err(VnexError::corrupt(
                stream.bit_tell() / 8,
                "gamma code longer than 32 bits",
            ));
        }
    }
    let rest = stream.read_bits(zeros)?;
    Ok((1u64 << zeros) | rest)
}

/// An unfinished run suspended at a target-length boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    /// Raw bytes still to be read from the bit stream.
    Literal(u64),
    /// Copies of the previous byte still to be emitted.
    Repeat(u64),
    /// Byte-aligned verbatim bytes still to be copied.
    Verbatim(u64),
}

/// Run-length gamma decoder.
#[derive(Debug)]
pub struct GammaDecoder {
    input: Vec<u8>,
    /// Bit cursor into `input`, persisted across decode calls.
    cursor: u64,
    previous: u8,
    pending: Pending,
}

impl Default for GammaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaDecoder {
    /// Create a decoder with no input.
    pub fn new() -> Self {
        Self {
            input: Vec::new(),
            cursor: 0,
            previous: 0,
            pending: Pending::None,
        }
    }

    /// Set a new compressed buffer and reset the session.
    pub fn set_input(&mut self, input: Vec<u8>) {
        self.input = input;
        self.cursor = 0;
        self.previous = 0;
        self.pending = Pending::None;
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
        let mut stream = MemoryStream::with_bit_order(&self.input, BitOrder::MsbFirst);
        stream.bit_seek(self.cursor);

        while output.len() < target_length {
            let room = (target_length - output.len()) as u64;
            self.pending = match self.pending {
                Pending::None => {
                    if stream.read_bit()? == 0 {
                        Pending::Literal(read_gamma(&mut stream)?)
                    } else if stream.read_bit()? == 0 {
                        Pending::Repeat(read_gamma(&mut stream)?)
                    } else {
                        stream.align_to_byte();
                        Pending::Verbatim(stream.read_bits(8)? + 1)
                    }
                }
                Pending::Literal(n) => {
                    let take = n.min(room);
                    for _ in 0..take {
                        self.previous = stream.read_bits(8)? as u8;
                        output.push(self.previous);
                    }
                    if n > take {
                        Pending::Literal(n - take)
                    } else {
                        Pending::None
                    }
                }
                Pending::Repeat(n) => {
                    let take = n.min(room);
                    for _ in 0..take {
                        output.push(self.previous);
                    }
                    if n > take {
                        Pending::Repeat(n - take)
                    } else {
                        Pending::None
                    }
                }
                Pending::Verbatim(n) => {
                    let take = n.min(room);
                    for _ in 0..take {
                        self.previous = stream.read_bits(8)? as u8;
                        output.push(self.previous);
                    }
                    if n > take {
                        Pending::Verbatim(n - take)
                    } else {
                        Pending::None
                    }
                }
            };
        }

        self.cursor = stream.bit_tell();
        Ok(output)
    }
}
