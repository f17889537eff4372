//! Error types for vnex operations.
//!
//! This module provides one error type that covers every failure mode of a
//! decode session: I/O errors, structural corruption, and recognized but
//! unimplemented format features. All variants are terminal for the single
//! file or entry being processed; nothing here is retried internally, since
//! retrying a deterministic parse of the same bytes cannot change the
//! outcome.

use std::io;
use thiserror::Error;

/// The main error type for vnex operations.
#[derive(Debug, Error)]
pub enum VnexError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in a container signature.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Structurally inconsistent input (truncated directory, exhausted
    /// entropy stream, inconsistent offsets).
    #[error("Corrupt data at offset {offset}: {message}")]
    CorruptData {
        /// Byte offset where the inconsistency was detected.
        offset: u64,
        /// Description of the inconsistency.
        message: String,
    },

    /// Recognized but unimplemented codec, transform, or format feature.
    #[error("Not supported: {what}")]
    NotSupported {
        /// Description of the unsupported feature.
        what: String,
    },

    /// Explicit version field outside the known set.
    #[error("Unsupported version: {version:#010x}")]
    UnsupportedVersion {
        /// The version value found in the header.
        version: u32,
    },

    /// Decoded pixel depth does not map to a known pixel format.
    #[error("Unsupported bit depth: {depth}")]
    UnsupportedBitDepth {
        /// The offending depth in bits per pixel.
        depth: u32,
    },

    /// Read past the end of the input buffer.
    #[error("Unexpected end of data: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// A named section is absent from a container directory.
    #[error("Section not found: {tag:?}")]
    SectionNotFound {
        /// The tag that was looked up.
        tag: String,
    },

    /// Entry not found in archive metadata.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// Name of the missing entry.
        name: String,
    },

    /// Pixel buffer length does not match width x height x bytes-per-pixel.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// Invalid prefix code encountered during entropy decoding.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// Text decoding error (e.g., invalid Shift_JIS in an entry name).
    #[error("Encoding error: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },
}

/// Result type alias for vnex operations.
pub type Result<T> = std::result::Result<T, VnexError>;

impl VnexError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a corrupt data error.
    pub fn corrupt(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptData {
            offset,
            message: message.into(),
        }
    }

    /// Create a not supported error.
    pub fn not_supported(what: impl Into<String>) -> Self {
        Self::NotSupported { what: what.into() }
    }

    /// Create an unsupported version error.
    pub fn unsupported_version(version: u32) -> Self {
        Self::UnsupportedVersion { version }
    }

    /// Create an unsupported bit depth error.
    pub fn unsupported_bit_depth(depth: u32) -> Self {
        Self::UnsupportedBitDepth { depth }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a section not found error.
    pub fn section_not_found(tag: impl Into<String>) -> Self {
        Self::SectionNotFound { tag: tag.into() }
    }

    /// Create an entry not found error.
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }

    /// Create a buffer size mismatch error.
    pub fn buffer_size_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}
