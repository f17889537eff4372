//! Entis rasterized images (ERI).
//!
//! An ERI file is a 0x40-byte signature preamble followed by a sequential
//! section container. The `Header` section nests an `ImageInf` record that
//! selects the entropy codec and declares the geometry; the `Stream` section
//! holds one `ImageFrm` subsection per frame. Frames share one canvas,
//! stacked top to bottom.
//!
//! Each frame payload is a u32-le decoded byte count followed by the
//! compressed stream. The pixel depth actually used is recomputed from that
//! count, because headers in the wild disagree with their own payloads.

pub mod header;

pub use header::EriHeader;

use header::{MAGIC1, read_preamble};
use vnex_core::decode::ImageDecoder;
use vnex_core::error::{Result, VnexError};
use vnex_core::image::{Image, OverlayKind, PixelFormat};
use vnex_core::sections::SectionReader;
use vnex_core::stream::MemoryStream;
use vnex_erisa::EntropyDecoder;

/// Decoder for ERI images.
#[derive(Debug, Clone, Copy, Default)]
pub struct EriDecoder;

impl EriDecoder {
    /// Create the decoder.
    pub fn new() -> Self {
        Self
    }
}

/// Pixel depth implied by a decoded frame of `len` bytes.
fn actual_depth(len: usize, width: u32, height: u32) -> Result<u32> {
    let pixels = width as u64 * height as u64;
    if pixels == 0 {
        return Err(VnexError::corrupt(0, "image has zero pixels"));
    }
    Ok((len as u64 * 8 / pixels) as u32)
}

impl ImageDecoder for EriDecoder {
    fn is_recognized(&self, stream: &mut MemoryStream<'_>) -> bool {
        stream.seek(0);
        stream.peek(MAGIC1.len()).is_ok_and(|m| m == MAGIC1)
    }

    fn decode(&self, stream: &mut MemoryStream<'_>) -> Result<Image> {
        stream.seek(0);
        read_preamble(stream)?;
        let container = SectionReader::scan(stream)?;

        let header_section = container.get_section("Header")?;
        stream.seek(header_section.offset);
        let header_container = SectionReader::scan_within(stream, header_section.size)?;
        let info = header_container.get_section("ImageInf")?;
        stream.seek(info.offset);
        let header = EriHeader::parse(stream)?;

        let width = header.width.unsigned_abs();
        let height = header.height.unsigned_abs();
        // Rows stored bottom-up are normalized to top-down.
        let flip = header.height < 0;

        let stream_section = container.get_section("Stream")?;
        stream.seek(stream_section.offset);
        let frame_container = SectionReader::scan_within(stream, stream_section.size)?;
        let frames = frame_container.get_sections("ImageFrm");
        if frames.is_empty() {
            return Err(VnexError::corrupt(
                stream_section.offset,
                "image stream holds no frames",
            ));
        }

        let mut canvas: Option<Image> = None;
        for (index, frame) in frames.iter().enumerate() {
            if frame.size < 4 {
                return Err(VnexError::corrupt(frame.offset, "frame too short"));
            }
            stream.seek(frame.offset);
            let decoded_size = stream.read_u32_le()? as usize;
            let payload = stream.read(frame.size as usize - 4)?;

            let mut decoder = EntropyDecoder::for_architecture(header.architecture);
            decoder.set_input(payload.to_vec());
            let decoded = decoder.decode(decoded_size)?;

            let format = PixelFormat::from_depth(actual_depth(decoded.len(), width, height)?)?;
            let mut image = Image::from_raw(width, height, decoded, format)?;
            if flip {
                image.flip_vertically();
            }

            let canvas = canvas.get_or_insert_with(|| {
                Image::new(width, height * frames.len() as u32, format)
            });
            canvas.overlay(
                &image,
                0,
                index as i64 * height as i64,
                OverlayKind::OverwriteAll,
            )?;
        }

        // frames is non-empty, so the canvas exists.
        Ok(canvas.unwrap())
    }
}
