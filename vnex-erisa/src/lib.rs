//! # vnex ERISA codecs
//!
//! The entropy decoders used by Entis-family pixel streams. Three codecs
//! share one contract: feed a compressed buffer with
//! [`EntropyDecoder::set_input`], then pull decoded bytes on demand with
//! [`EntropyDecoder::decode`] until the target output length is reached.
//!
//! - [`huffman`]: canonical prefix codes over the byte alphabet
//! - [`gamma`]: run-length coding with Elias-gamma run lengths
//! - [`nemesis`]: LZ dictionary coding with Huffman-coded literals/lengths
//!
//! The codec set is closed and selected once per file from the header's
//! architecture tag, so dispatch is an enum rather than a trait object.
//!
//! Decoders never emit more than the requested target length: a run or a
//! dictionary match that crosses the target boundary is suspended and
//! resumed by the next `decode` call. Exhausting the compressed input
//! before the target is reached is corrupt data, never silence.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gamma;
pub mod huffman;
pub mod nemesis;

#[cfg(test)]
pub(crate) mod testutil;

pub use gamma::GammaDecoder;
pub use huffman::{CanonicalTable, HuffmanDecoder};
pub use nemesis::NemesisDecoder;

use vnex_core::error::{Result, VnexError};

/// Entropy-coding architecture tag from an Entis header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    /// Run-length coding with gamma-coded run lengths.
    RunLengthGamma,
    /// Canonical Huffman coding over the byte alphabet.
    RunLengthHuffman,
    /// Nemesis LZ dictionary coding.
    Nemesis,
}

impl Architecture {
    /// Map the raw header field to a known architecture.
    ///
    /// Unknown tags are a not-supported condition, fatal for the file being
    /// decoded but not for a batch.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            0xFFFF_FFFF => Ok(Self::RunLengthGamma),
            0xFFFF_FFFC => Ok(Self::RunLengthHuffman),
            0xFFFF_FFF0 => Ok(Self::Nemesis),
            other => Err(VnexError::not_supported(format!(
                "architecture type {other:#010x}"
            ))),
        }
    }
}

/// Pixel-transformation tag from an Entis header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    /// Lossless byte arrangement; the only transformation supported.
    Lossless,
}

impl Transformation {
    /// Map the raw header field to a known transformation.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            0x0302_0000 => Ok(Self::Lossless),
            other => Err(VnexError::not_supported(format!(
                "transformation type {other:#010x}"
            ))),
        }
    }
}

/// The closed family of entropy decoders.
#[derive(Debug)]
pub enum EntropyDecoder {
    /// Run-length gamma decoder.
    Gamma(GammaDecoder),
    /// Canonical Huffman decoder.
    Huffman(HuffmanDecoder),
    /// Nemesis LZ decoder.
    Nemesis(NemesisDecoder),
}

impl EntropyDecoder {
    /// Create the decoder selected by an architecture tag.
    pub fn for_architecture(architecture: Architecture) -> Self {
        match architecture {
            Architecture::RunLengthGamma => Self::Gamma(GammaDecoder::new()),
            Architecture::RunLengthHuffman => Self::Huffman(HuffmanDecoder::new()),
            Architecture::Nemesis => Self::Nemesis(NemesisDecoder::new()),
        }
    }

    /// Set a new compressed input buffer, resetting all session state.
    pub fn set_input(&mut self, input: Vec<u8>) {
        match self {
            Self::Gamma(d) => d.set_input(input),
            Self::Huffman(d) => d.set_input(input),
            Self::Nemesis(d) => d.set_input(input),
        }
    }

    /// Produce exactly `target_length` decoded bytes.
    pub fn decode(&mut self, target_length: usize) -> Result<Vec<u8>> {
        match self {
            Self::Gamma(d) => d.decode(target_length),
            Self::Huffman(d) => d.decode(target_length),
            Self::Nemesis(d) => d.decode(target_length),
        }
    }
}

/// Exhausting the compressed input mid-decode is corrupt input.
pub(crate) fn exhausted_at(bit_position: u64) -> VnexError {
    VnexError::corrupt(
        bit_position / 8,
        "compressed stream exhausted before target length",
    )
}
