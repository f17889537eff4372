//! Archive entry metadata and the two-phase extraction contract.
//!
//! Extraction is always the same shape: a decoder scans the container
//! directory once and builds an ordered [`ArchiveMeta`] (names, offsets,
//! sizes, per-entry extras), then materializes entries one at a time. No
//! entry is mutated after creation, and entries may be extracted in any
//! order or as a subset.

use crate::error::{Result, VnexError};

/// Per-entry payload transform applied during materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryTransform {
    /// Payload bytes are stored as-is.
    #[default]
    None,
    /// Byte `i` of the payload is XORed with `(i + bias) & 0xFF`.
    XorKeystream {
        /// Starting value of the keystream counter.
        bias: u8,
    },
}

impl EntryTransform {
    /// Apply the transform to a materialized payload in place.
    ///
    /// All transforms here are involutions, so applying the same transform
    /// to already-stored data recovers the plaintext.
    pub fn apply(&self, data: &mut [u8]) {
        match self {
            Self::None => {}
            Self::XorKeystream { bias } => {
                for (i, byte) in data.iter_mut().enumerate() {
                    *byte ^= (i.wrapping_add(*bias as usize) & 0xFF) as u8;
                }
            }
        }
    }
}

/// Format-specific extra fields carried by an entry.
///
/// A closed extension variant rather than a per-format entry hierarchy: the
/// common fields stay fixed and the extras travel as one tagged value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntryExtra {
    /// No extra fields.
    #[default]
    None,
    /// Opaque format-specific bytes.
    Raw(Vec<u8>),
    /// Texture parameters for image-archive formats.
    Texture {
        /// Palette table index, or -1 for unpaletted textures.
        palette_index: i32,
        /// Raw texture-type tag from the container.
        texture_type: u32,
        /// Raw base-format tag from the container.
        base_format: u32,
        /// Texture width in pixels.
        width: u16,
        /// Texture height in pixels.
        height: u16,
    },
}

/// One entry in an archive's metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Decoded entry name.
    pub name: String,
    /// Absolute offset of the entry payload.
    pub offset: u64,
    /// Payload size in bytes.
    pub size: u64,
    /// Transform to apply when materializing the payload.
    pub transform: EntryTransform,
    /// Format-specific extra fields.
    pub extra: EntryExtra,
}

impl ArchiveEntry {
    /// Create an entry with no transform and no extras.
    pub fn new(name: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
            transform: EntryTransform::None,
            extra: EntryExtra::None,
        }
    }

    /// Builder method to set the payload transform.
    pub fn with_transform(mut self, transform: EntryTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder method to set the extra fields.
    pub fn with_extra(mut self, extra: EntryExtra) -> Self {
        self.extra = extra;
        self
    }

    /// Get a path that is safe to create under an extraction root.
    ///
    /// Drops absolute prefixes and parent-directory components and replaces
    /// NUL bytes, so a hostile name cannot escape the output directory.
    pub fn sanitized_name(&self) -> String {
        let mut result = String::new();
        for component in std::path::Path::new(&self.name).components() {
            if let std::path::Component::Normal(s) = component {
                if !result.is_empty() {
                    result.push('/');
                }
                result.push_str(&s.to_string_lossy().replace('\0', "_"));
            }
        }
        result
    }
}

/// The ordered entry table of one archive.
///
/// Owned by the decode session; insertion order is table order.
#[derive(Debug, Clone, Default)]
pub struct ArchiveMeta {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveMeta {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, preserving table order.
    pub fn push(&mut self, entry: ArchiveEntry) {
        self.entries.push(entry);
    }

    /// All entries in table order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Result<&ArchiveEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| VnexError::entry_not_found(name))
    }
}

impl<'a> IntoIterator for &'a ArchiveMeta {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
