//! Chunked container directories.
//!
//! Composite formats locate their sub-streams through a directory of named
//! sections (tag + size + offset). Two directory conventions exist in the
//! wild:
//!
//! - **Sequential**: each record is `(8-byte tag, u64-le size)` and the
//!   payload follows immediately; the next record starts after the payload.
//!   Entis containers use this layout.
//! - **Indexed**: one table of `(8-byte tag, u32-le offset, u32-le size)`
//!   records, with offsets relative to a caller-supplied base.
//!
//! Nesting needs no special casing: re-seek the stream to a section's offset
//! and scan its payload as its own container with [`SectionReader::scan_within`].

use crate::error::{Result, VnexError};
use crate::stream::MemoryStream;

/// Length of a raw section tag in bytes.
pub const TAG_LEN: usize = 8;

/// A named, offset-addressed region within a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Tag with trailing spaces and NULs trimmed.
    pub tag: String,
    /// Absolute offset of the section payload.
    pub offset: u64,
    /// Payload size in bytes.
    pub size: u64,
}

fn decode_tag(raw: &[u8]) -> String {
    let trimmed = raw
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(&raw[..0], |i| &raw[..=i]);
    String::from_utf8_lossy(trimmed).into_owned()
}

/// An immutable directory of sections parsed from a container region.
///
/// Tags are unique only by convention; lookups return the first match or all
/// matches in directory order. Repeated tags (e.g. one `ImageFrm` per frame)
/// represent an ordered sequence.
#[derive(Debug, Clone)]
pub struct SectionReader {
    sections: Vec<Section>,
}

impl SectionReader {
    /// Scan a sequential directory from the current position to the end of
    /// the stream.
    pub fn scan(stream: &mut MemoryStream<'_>) -> Result<Self> {
        let remaining = stream.remaining() as u64;
        Self::scan_within(stream, remaining)
    }

    /// Scan a sequential directory bounded to `length` bytes from the
    /// current position.
    pub fn scan_within(stream: &mut MemoryStream<'_>, length: u64) -> Result<Self> {
        let end = stream.tell().checked_add(length);
        let end = match end {
            Some(end) if end <= stream.len() as u64 => end,
            _ => {
                return Err(VnexError::corrupt(
                    stream.tell(),
                    "container region extends past end of data",
                ));
            }
        };
        let mut sections = Vec::new();
        while stream.tell() < end {
            if end - stream.tell() < (TAG_LEN + 8) as u64 {
                return Err(VnexError::corrupt(
                    stream.tell(),
                    "truncated section descriptor",
                ));
            }
            let tag = decode_tag(stream.read(TAG_LEN)?);
            let size = stream.read_u64_le()?;
            let offset = stream.tell();
            // checked: a hostile size near u64::MAX must not wrap the
            // overrun test around.
            if offset.checked_add(size).is_none_or(|e| e > end) {
                return Err(VnexError::corrupt(
                    offset,
                    format!("section {tag:?} overruns its container"),
                ));
            }
            sections.push(Section { tag, offset, size });
            stream.seek(offset + size);
        }
        Ok(Self { sections })
    }

    /// Read an indexed directory of `count` records; payload offsets in the
    /// table are relative to `base`.
    pub fn scan_indexed(stream: &mut MemoryStream<'_>, count: usize, base: u64) -> Result<Self> {
        let mut sections = Vec::with_capacity(count);
        for _ in 0..count {
            let tag = decode_tag(stream.read(TAG_LEN)?);
            let relative = stream.read_u32_le()? as u64;
            let size = stream.read_u32_le()? as u64;
            let end = base
                .checked_add(relative)
                .and_then(|offset| offset.checked_add(size));
            if end.is_none_or(|e| e > stream.len() as u64) {
                return Err(VnexError::corrupt(
                    stream.tell(),
                    format!("section {tag:?} overruns its container"),
                ));
            }
            let offset = base + relative;
            sections.push(Section { tag, offset, size });
        }
        Ok(Self { sections })
    }

    /// All sections in directory order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with the given tag.
    pub fn get_section(&self, tag: &str) -> Result<&Section> {
        self.sections
            .iter()
            .find(|s| s.tag == tag)
            .ok_or_else(|| VnexError::section_not_found(tag))
    }

    /// All sections with the given tag, in directory order.
    pub fn get_sections(&self, tag: &str) -> Vec<&Section> {
        self.sections.iter().filter(|s| s.tag == tag).collect()
    }
}
