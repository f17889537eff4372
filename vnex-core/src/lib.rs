//! # vnex Core
//!
//! Core components for the vnex asset-extraction framework.
//!
//! This crate provides the shared decoding primitives that every format
//! plugin builds on:
//!
//! - [`stream`]: seekable byte/bit reading over an in-memory buffer
//! - [`sections`]: nested chunked-container directories
//! - [`varint`]: the format-specific packed integer used by some directories
//! - [`image`]: the canonical pixel-image model (flip, overlay)
//! - [`entry`]: archive entry metadata and per-entry transforms
//! - [`decode`]: the plugin contract (image decode, two-phase extraction)
//! - [`text`]: legacy entry-name decoding
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! vnex is layered the same way the formats are:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ CLI / batch callers                                      │
//! ├──────────────────────────────────────────────────────────┤
//! │ Format plugins (vnex-formats)                            │
//! │     signature checks, header layouts, entry tables       │
//! ├──────────────────────────────────────────────────────────┤
//! │ Entropy codecs (vnex-erisa)                              │
//! │     canonical Huffman, run-length gamma, Nemesis LZ      │
//! ├──────────────────────────────────────────────────────────┤
//! │ Primitives (this crate)                                  │
//! │     MemoryStream, SectionReader, Image, ArchiveMeta      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is single-threaded and synchronous per file; separate files
//! can be decoded on separate threads with no shared state.
//!
//! ## Example
//!
//! ```rust
//! use vnex_core::stream::MemoryStream;
//!
//! let data = [0x49u8, 0x47, 0x41, 0x30, 0x05, 0x00];
//! let mut stream = MemoryStream::new(&data);
//! assert_eq!(stream.read(4).unwrap(), b"IGA0");
//! assert_eq!(stream.read_u16_le().unwrap(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod entry;
pub mod error;
pub mod image;
pub mod sections;
pub mod stream;
pub mod text;
pub mod varint;

// Re-exports for convenience
pub use decode::{ArchiveDecoder, ExtractedFile, ImageDecoder};
pub use entry::{ArchiveEntry, ArchiveMeta, EntryExtra, EntryTransform};
pub use error::{Result, VnexError};
pub use image::{Image, OverlayKind, PixelFormat};
pub use sections::{Section, SectionReader};
pub use stream::{BitOrder, MemoryStream};
