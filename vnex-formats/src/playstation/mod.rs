//! PlayStation Vita GXT texture archives.
//!
//! A 32-byte header (magic, version, texture count, data region
//! offset/size, palette counts) followed by one 32-byte record per texture.
//! Entries carry their texture parameters in [`EntryExtra::Texture`];
//! extraction supports unpaletted linear textures only and validates the
//! payload as a grayscale image of the declared size.

use vnex_core::decode::{ArchiveDecoder, ExtractedFile};
use vnex_core::entry::{ArchiveEntry, ArchiveMeta, EntryExtra};
use vnex_core::error::{Result, VnexError};
use vnex_core::image::{Image, PixelFormat};
use vnex_core::stream::MemoryStream;

/// File signature.
pub const MAGIC: &[u8] = b"GXT\x00";

/// The only container version this decoder understands.
pub const KNOWN_VERSION: u32 = 0x1000_0003;

/// Texture-type tag for linear (unswizzled) layout.
pub const TEXTURE_TYPE_LINEAR: u32 = 0x6000_0000;

/// Decoder for GXT texture archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct GxtDecoder;

impl GxtDecoder {
    /// Create the decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveDecoder for GxtDecoder {
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
        let version = stream.read_u32_le()?;
        if version != KNOWN_VERSION {
            return Err(VnexError::unsupported_version(version));
        }
        let texture_count = stream.read_u32_le()?;
        let _data_offset = stream.read_u32_le()?;
        let _data_size = stream.read_u32_le()?;
        let _p4_palette_count = stream.read_u32_le()?;
        let _p8_palette_count = stream.read_u32_le()?;
        stream.skip(4)?; // header padding

        let mut meta = ArchiveMeta::new();
        for index in 0..texture_count {
            let offset = stream.read_u32_le()? as u64;
            let size = stream.read_u32_le()? as u64;
            let palette_index = stream.read_u32_le()? as i32;
            let _flags = stream.read_u32_le()?;
            let texture_type = stream.read_u32_le()?;
            let base_format = stream.read_u32_le()?;
            let width = stream.read_u16_le()?;
            let height = stream.read_u16_le()?;
            let _mipmap_count = stream.read_u16_le()?;
            stream.skip(2)?; // record padding

            meta.push(
                ArchiveEntry::new(format!("{index:03}.tex"), offset, size).with_extra(
                    EntryExtra::Texture {
                        palette_index,
                        texture_type,
                        base_format,
                        width,
                        height,
                    },
                ),
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
        let EntryExtra::Texture {
            palette_index,
            texture_type,
            width,
            height,
            ..
        } = entry.extra
        else {
            return Err(VnexError::corrupt(
                entry.offset,
                "texture entry without texture parameters",
            ));
        };
        if palette_index != -1 {
            return Err(VnexError::not_supported("paletted textures"));
        }
        if texture_type != TEXTURE_TYPE_LINEAR {
            return Err(VnexError::not_supported(format!(
                "texture type {texture_type:#010x}"
            )));
        }

        stream.seek(entry.offset);
        let data = stream.read(entry.size as usize)?.to_vec();
        // Size sanity: the payload must form a complete grayscale raster.
        let image = Image::from_raw(width as u32, height as u32, data, PixelFormat::Gray8)?;
        Ok(ExtractedFile::new(entry.name.clone(), image.into_data()))
    }
}
