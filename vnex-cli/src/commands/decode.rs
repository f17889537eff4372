//! Decode command implementation.
//!
//! Writes the canonical image as PGM (grayscale) or PPM (color). Color
//! images are stored blue-first internally and reordered on the way out;
//! alpha has no netpbm representation and is dropped.

use super::detect_format;
use std::path::{Path, PathBuf};
use vnex_core::image::{Image, PixelFormat};
use vnex_core::stream::MemoryStream;
use vnex_formats::{Decoder, Registry};

fn netpbm_bytes(image: &Image) -> (Vec<u8>, &'static str) {
    let width = image.width();
    let height = image.height();
    match image.format() {
        PixelFormat::Gray8 => {
            let mut out = format!("P5\n{width} {height}\n255\n").into_bytes();
            out.extend_from_slice(image.data());
            (out, "pgm")
        }
        PixelFormat::Bgr888 => {
            let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
            for pixel in image.data().chunks_exact(3) {
                out.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
            }
            (out, "ppm")
        }
        PixelFormat::Bgra8888 => {
            let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
            for pixel in image.data().chunks_exact(4) {
                out.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
            }
            (out, "ppm")
        }
    }
}

pub fn cmd_decode(image: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(image)?;
    let registry = Registry::new();
    let (format, decoder) = detect_format(&registry, image, &data)?;
    let Decoder::Image(decoder) = decoder else {
        return Err(format!("{}: {format} is not an image format", image.display()).into());
    };

    let mut stream = MemoryStream::new(&data);
    let decoded = decoder.decode(&mut stream)?;

    let (bytes, extension) = netpbm_bytes(&decoded);
    let target: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => image.with_extension(extension),
    };
    std::fs::write(&target, bytes)?;
    println!(
        "{}: {}x{} {:?} -> {}",
        image.display(),
        decoded.width(),
        decoded.height(),
        decoded.format(),
        target.display()
    );
    Ok(())
}
