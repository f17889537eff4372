//! End-to-end decoding of hand-built ERI images.

use vnex_core::decode::ImageDecoder;
use vnex_core::error::VnexError;
use vnex_core::image::PixelFormat;
use vnex_core::stream::MemoryStream;
use vnex_formats::EriDecoder;

const VERSION: u32 = 0x0002_0100;
const TRANSFORMATION_LOSSLESS: u32 = 0x0302_0000;
const ARCHITECTURE_GAMMA: u32 = 0xFFFF_FFFF;

/// MSB-first bit writer for composing compressed frame payloads.
#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    bit: u8,
}

impl BitWriter {
    fn push_bit(&mut self, bit: u8) {
        if self.bit == 0 {
            self.bytes.push(0);
        }
        if bit != 0 {
            *self.bytes.last_mut().unwrap() |= 1 << (7 - self.bit);
        }
        self.bit = (self.bit + 1) % 8;
    }

    fn push_bits(&mut self, value: u64, count: u32) {
        for i in (0..count).rev() {
            self.push_bit(((value >> i) & 1) as u8);
        }
    }

    fn push_gamma(&mut self, value: u64) {
        let bits = 64 - value.leading_zeros();
        for _ in 1..bits {
            self.push_bit(0);
        }
        self.push_bits(value, bits);
    }
}

/// Gamma-codec frame payload: decoded size, then one literal run.
fn frame_payload(pixels: &[u8]) -> Vec<u8> {
    let mut w = BitWriter::default();
    w.push_bit(0); // literal run
    w.push_gamma(pixels.len() as u64);
    for &b in pixels {
        w.push_bits(b as u64, 8);
    }
    let mut out = (pixels.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&w.bytes);
    out
}

fn section(tag: &str, payload: &[u8]) -> Vec<u8> {
    let mut raw = [b' '; 8];
    raw[..tag.len()].copy_from_slice(tag.as_bytes());
    let mut out = raw.to_vec();
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn preamble() -> Vec<u8> {
    let mut out = Vec::with_capacity(0x40);
    out.extend_from_slice(b"Entis\x1a\x00\x00");
    out.extend_from_slice(&[0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00]);
    out.extend_from_slice(b"Entis Rasterized Image");
    out.resize(0x40, 0);
    out
}

fn image_info(version: u32, architecture: u32, width: i32, height: i32, depth: u32) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [version, TRANSFORMATION_LOSSLESS, architecture, 0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    for v in [depth, 0, 0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    for v in [0u32, 0, 0, 0] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// A complete file: preamble, Header/ImageInf, Stream with one ImageFrm per
/// frame.
fn build_image(version: u32, architecture: u32, height: i32, frames: &[&[u8]]) -> Vec<u8> {
    let info = image_info(version, architecture, 2, height, 8);
    let mut stream_payload = Vec::new();
    for frame in frames {
        stream_payload.extend(section("ImageFrm", &frame_payload(frame)));
    }

    let mut out = preamble();
    out.extend(section("Header", &section("ImageInf", &info)));
    out.extend(section("Stream", &stream_payload));
    out
}

#[test]
fn test_recognition() {
    let data = build_image(VERSION, ARCHITECTURE_GAMMA, 2, &[&[0; 4]]);
    let decoder = EriDecoder::new();
    assert!(decoder.is_recognized(&mut MemoryStream::new(&data)));
    assert!(!decoder.is_recognized(&mut MemoryStream::new(b"IGA0")));
}

#[test]
fn test_single_frame() {
    let data = build_image(VERSION, ARCHITECTURE_GAMMA, 2, &[&[1, 2, 3, 4]]);
    let mut stream = MemoryStream::new(&data);
    let image = EriDecoder::new().decode(&mut stream).unwrap();

    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.format(), PixelFormat::Gray8);
    assert_eq!(image.data(), &[1, 2, 3, 4]);
}

#[test]
fn test_two_frames_stack_vertically() {
    let data = build_image(
        VERSION,
        ARCHITECTURE_GAMMA,
        2,
        &[&[1, 2, 3, 4], &[5, 6, 7, 8]],
    );
    let mut stream = MemoryStream::new(&data);
    let image = EriDecoder::new().decode(&mut stream).unwrap();

    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 4);
    // Stacking two frames equals concatenating their rows.
    assert_eq!(image.data(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_negative_height_flips_each_frame() {
    let data = build_image(
        VERSION,
        ARCHITECTURE_GAMMA,
        -2,
        &[&[1, 2, 3, 4], &[5, 6, 7, 8]],
    );
    let mut stream = MemoryStream::new(&data);
    let image = EriDecoder::new().decode(&mut stream).unwrap();

    assert_eq!(image.height(), 4);
    assert_eq!(image.data(), &[3, 4, 1, 2, 7, 8, 5, 6]);
}

#[test]
fn test_decoding_is_deterministic() {
    let data = build_image(VERSION, ARCHITECTURE_GAMMA, 2, &[&[9, 8, 7, 6]]);
    let a = EriDecoder::new().decode(&mut MemoryStream::new(&data)).unwrap();
    let b = EriDecoder::new().decode(&mut MemoryStream::new(&data)).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_unknown_version() {
    let data = build_image(0x0001_0000, ARCHITECTURE_GAMMA, 2, &[&[0; 4]]);
    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        EriDecoder::new().decode(&mut stream).unwrap_err(),
        VnexError::UnsupportedVersion { .. }
    ));
}

#[test]
fn test_unknown_architecture() {
    let data = build_image(VERSION, 0x1234_5678, 2, &[&[0; 4]]);
    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        EriDecoder::new().decode(&mut stream).unwrap_err(),
        VnexError::NotSupported { .. }
    ));
}

#[test]
fn test_no_frames_is_corrupt() {
    let data = build_image(VERSION, ARCHITECTURE_GAMMA, 2, &[]);
    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        EriDecoder::new().decode(&mut stream).unwrap_err(),
        VnexError::CorruptData { .. }
    ));
}

#[test]
fn test_missing_stream_section() {
    let info = image_info(VERSION, ARCHITECTURE_GAMMA, 2, 2, 8);
    let mut data = preamble();
    data.extend(section("Header", &section("ImageInf", &info)));
    let mut stream = MemoryStream::new(&data);
    assert!(matches!(
        EriDecoder::new().decode(&mut stream).unwrap_err(),
        VnexError::SectionNotFound { .. }
    ));
}

#[test]
fn test_decoded_size_drives_pixel_depth() {
    // A frame decoding to 12 bytes over 2x2 pixels implies 24-bit pixels,
    // whatever the header's declared depth says.
    let pixels: Vec<u8> = (1..=12).collect();
    let data = build_image(VERSION, ARCHITECTURE_GAMMA, 2, &[&pixels]);
    let mut stream = MemoryStream::new(&data);
    let image = EriDecoder::new().decode(&mut stream).unwrap();
    assert_eq!(image.format(), PixelFormat::Bgr888);
    assert_eq!(image.data(), pixels.as_slice());
}
