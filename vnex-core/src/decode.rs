//! The plugin contract implemented by format decoders.
//!
//! Every format is a thin adapter over the core primitives: it recognizes a
//! file by signature, then either reconstructs one canonical [`Image`] or
//! drives the two-phase archive contract (`read_meta`, then `read_file` per
//! entry). Decoders are stateless; all per-file state lives in the stream
//! and the returned values, so separate files can be processed on separate
//! threads with no synchronization.

use crate::entry::{ArchiveEntry, ArchiveMeta};
use crate::error::Result;
use crate::image::Image;
use crate::stream::MemoryStream;

/// A materialized archive entry: name plus payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Entry name as decoded from the metadata table.
    pub name: String,
    /// Payload bytes with any per-entry transform already applied.
    pub data: Vec<u8>,
}

impl ExtractedFile {
    /// Create an extracted file.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A decoder that turns one recognized file into one [`Image`].
pub trait ImageDecoder: Send + Sync {
    /// Check the signature at the start of the stream.
    ///
    /// Must not be affected by the stream's incoming position and must not
    /// fail on short input; unreadable means unrecognized.
    fn is_recognized(&self, stream: &mut MemoryStream<'_>) -> bool;

    /// Decode the whole file into a canonical image.
    ///
    /// Either returns a complete image or fails; partial output is never
    /// returned.
    fn decode(&self, stream: &mut MemoryStream<'_>) -> Result<Image>;
}

/// A decoder for container formats holding a flat file list.
pub trait ArchiveDecoder: Send + Sync {
    /// Check the signature at the start of the stream.
    fn is_recognized(&self, stream: &mut MemoryStream<'_>) -> bool;

    /// Scan the metadata region and build the ordered entry table.
    ///
    /// Must not read entry payload bytes.
    fn read_meta(&self, stream: &mut MemoryStream<'_>) -> Result<ArchiveMeta>;

    /// Materialize one entry: seek to its offset, read exactly `entry.size`
    /// bytes, and apply the entry's declared transform.
    ///
    /// Idempotent; entries may be materialized in any order or not at all.
    fn read_file(
        &self,
        stream: &mut MemoryStream<'_>,
        meta: &ArchiveMeta,
        entry: &ArchiveEntry,
    ) -> Result<ExtractedFile>;
}
