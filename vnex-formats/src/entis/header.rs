//! Entis file preamble and raster image header.

use vnex_core::error::{Result, VnexError};
use vnex_core::stream::MemoryStream;
use vnex_erisa::{Architecture, Transformation};

/// Total preamble length; the space after the three magics is zero-padded.
pub const PREAMBLE_LEN: u64 = 0x40;

/// First magic: container family.
pub const MAGIC1: &[u8] = b"Entis\x1a\x00\x00";

/// Second magic: container revision.
pub const MAGIC2: &[u8] = &[0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00];

/// Third magic: payload kind.
pub const MAGIC3: &[u8] = b"Entis Rasterized Image";

/// Image format versions this decoder understands.
const KNOWN_VERSIONS: [u32; 2] = [0x0002_0100, 0x0002_0200];

/// Validate the 0x40-byte signature preamble and leave the stream at the
/// first section descriptor.
pub fn read_preamble(stream: &mut MemoryStream<'_>) -> Result<()> {
    let magic1 = stream.read(MAGIC1.len())?;
    if magic1 != MAGIC1 {
        return Err(VnexError::invalid_magic(MAGIC1, magic1));
    }
    let magic2 = stream.read(MAGIC2.len())?;
    if magic2 != MAGIC2 {
        return Err(VnexError::invalid_magic(MAGIC2, magic2));
    }
    let magic3 = stream.read(MAGIC3.len())?;
    if magic3 != MAGIC3 {
        return Err(VnexError::invalid_magic(MAGIC3, magic3));
    }
    stream.seek(PREAMBLE_LEN);
    Ok(())
}

/// The `ImageInf` record: raster geometry plus codec selection.
///
/// Fields follow the on-disk order; the tail fields are carried but unused
/// by lossless decoding.
#[derive(Debug, Clone, Copy)]
pub struct EriHeader {
    /// Image format version.
    pub version: u32,
    /// Pixel transformation applied before entropy coding.
    pub transformation: Transformation,
    /// Entropy-coding architecture.
    pub architecture: Architecture,
    /// Raw pixel layout tag.
    pub format_type: u32,
    /// Signed width; the sign carries orientation.
    pub width: i32,
    /// Signed height; negative means rows are stored bottom-up.
    pub height: i32,
    /// Declared bits per pixel; the decoded stream size wins on conflict.
    pub bit_depth: u32,
    /// Transparent-color key.
    pub clipped_pixel: u32,
    /// Chroma sampling flags.
    pub sampling_flags: u32,
    /// Quantization mask for lossy streams.
    pub quantumized_bits: u64,
    /// Allotted bit budget for lossy streams.
    pub allotted_bits: u64,
    /// Block size exponent.
    pub blocking_degree: u32,
    /// Lapped-transform block count.
    pub lapped_block: u32,
    /// Inter-frame transformation tag.
    pub frame_transform: u32,
    /// Inter-frame block size exponent.
    pub frame_degree: u32,
}

impl EriHeader {
    /// Parse an `ImageInf` record at the current stream position.
    pub fn parse(stream: &mut MemoryStream<'_>) -> Result<Self> {
        let version = stream.read_u32_le()?;
        if !KNOWN_VERSIONS.contains(&version) {
            return Err(VnexError::unsupported_version(version));
        }
        Ok(Self {
            version,
            transformation: Transformation::from_raw(stream.read_u32_le()?)?,
            architecture: Architecture::from_raw(stream.read_u32_le()?)?,
            format_type: stream.read_u32_le()?,
            width: stream.read_u32_le()? as i32,
            height: stream.read_u32_le()? as i32,
            bit_depth: stream.read_u32_le()?,
            clipped_pixel: stream.read_u32_le()?,
            sampling_flags: stream.read_u32_le()?,
            quantumized_bits: stream.read_u64_le()?,
            allotted_bits: stream.read_u64_le()?,
            blocking_degree: stream.read_u32_le()?,
            lapped_block: stream.read_u32_le()?,
            frame_transform: stream.read_u32_le()?,
            frame_degree: stream.read_u32_le()?,
        })
    }
}
