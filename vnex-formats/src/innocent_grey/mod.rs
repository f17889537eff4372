//! Innocent Grey IGA archives.
//!
//! Layout after the 4-byte magic and a 12-byte reserved block, everything
//! packed-integer coded:
//!
//! 1. entry table: byte length, then `(name_offset, data_offset, data_size)`
//!    per entry
//! 2. name region: byte length, then one packed integer per name character;
//!    entry `i`'s name spans from its `name_offset` to the next entry's
//! 3. payload region: sized so the last entry ends at end of file; entry
//!    data offsets are relative to its start
//!
//! Payloads are obfuscated with a positional XOR keystream (bias 2).

use vnex_core::decode::{ArchiveDecoder, ExtractedFile};
use vnex_core::entry::{ArchiveEntry, ArchiveMeta, EntryTransform};
use vnex_core::error::{Result, VnexError};
use vnex_core::stream::MemoryStream;
use vnex_core::text::decode_name;
use vnex_core::varint::read_packed_u32;

/// File signature.
pub const MAGIC: &[u8] = b"IGA0";

/// Bytes reserved between the magic and the entry table.
const RESERVED_LEN: u64 = 12;

/// Keystream bias for payload de-obfuscation.
const XOR_BIAS: u8 = 2;

/// Directory record before name resolution.
struct RawEntry {
    name_offset: u64,
    data_offset: u64,
    data_size: u64,
}

/// Decoder for IGA archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgaDecoder;

impl IgaDecoder {
    /// Create the decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveDecoder for IgaDecoder {
    fn is_recognized(&self, stream: &mut MemoryStream<'_>) -> bool {
        stream.seek(0);
        stream.peek(MAGIC.len()).is_ok_and(|m| m == MAGIC)
    }

    fn read_meta(&self, stream: &mut MemoryStream<'_>) -> Result<ArchiveMeta> {
        stream.seek(0);
        let magic = stream.read(MAGIC.len())?;
        if magic != MAGIC {
            return Err(VnexError::invalid_magic(MAGIC, magic));
        }
        stream.skip(RESERVED_LEN)?;

        let table_size = read_packed_u32(stream)? as u64;
        let table_end = stream.tell() + table_size;
        let mut raw = Vec::new();
        while stream.tell() < table_end {
            raw.push(RawEntry {
                name_offset: read_packed_u32(stream)? as u64,
                data_offset: read_packed_u32(stream)? as u64,
                data_size: read_packed_u32(stream)? as u64,
            });
        }
        if stream.tell() != table_end {
            return Err(VnexError::corrupt(
                stream.tell(),
                "entry table overruns its declared size",
            ));
        }
        let Some(last) = raw.last() else {
            return Ok(ArchiveMeta::new());
        };

        // The payload region is anchored to the end of the file: the last
        // entry's data ends exactly there.
        let data_end = last.data_offset + last.data_size;
        if data_end > stream.len() as u64 {
            return Err(VnexError::corrupt(
                stream.tell(),
                "payload region larger than the file",
            ));
        }
        let data_base = stream.len() as u64 - data_end;

        let names_size = read_packed_u32(stream)? as u64;
        let names_start = stream.tell();

        let mut meta = ArchiveMeta::new();
        for (i, entry) in raw.iter().enumerate() {
            let name_end = match raw.get(i + 1) {
                Some(next) => next.name_offset,
                None => names_size,
            };
            if name_end < entry.name_offset || names_start + name_end > stream.len() as u64 {
                return Err(VnexError::corrupt(
                    names_start + entry.name_offset,
                    "name offsets are not monotonic",
                ));
            }
            stream.seek(names_start + entry.name_offset);
            let mut bytes = Vec::new();
            while stream.tell() < names_start + name_end {
                let code = read_packed_u32(stream)?;
                let byte = u8::try_from(code).map_err(|_| {
                    VnexError::corrupt(stream.tell(), "name character out of byte range")
                })?;
                bytes.push(byte);
            }
            meta.push(
                ArchiveEntry::new(
                    decode_name(&bytes)?,
                    data_base + entry.data_offset,
                    entry.data_size,
                )
                .with_transform(EntryTransform::XorKeystream { bias: XOR_BIAS }),
            );
        }
        Ok(meta)
    }

    fn read_file(
        &self,
        stream: &mut MemoryStream<'_>,
        _meta: &ArchiveMeta,
        entry: &ArchiveEntry,
    ) -> Result<ExtractedFile> {
        stream.seek(entry.offset);
        let mut data = stream.read(entry.size as usize)?.to_vec();
        entry.transform.apply(&mut data);
        Ok(ExtractedFile::new(entry.name.clone(), data))
    }
}
