//! Canonical in-memory pixel images.
//!
//! Format plugins decode into this one model: width, height, pixel format
//! tag, and a raw byte buffer whose length is enforced at construction.
//! Multi-frame payloads are assembled by repeated [`Image::overlay`] calls
//! onto a taller canvas, one row band per frame.

use crate::error::{Result, VnexError};

/// Pixel layout of an [`Image`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit grayscale.
    Gray8,
    /// 24-bit color, blue/green/red byte order.
    Bgr888,
    /// 32-bit color with alpha, blue/green/red/alpha byte order.
    Bgra8888,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Bgr888 => 3,
            Self::Bgra8888 => 4,
        }
    }

    /// Map a decoded bit depth to a pixel format.
    pub fn from_depth(depth: u32) -> Result<Self> {
        match depth {
            8 => Ok(Self::Gray8),
            24 => Ok(Self::Bgr888),
            32 => Ok(Self::Bgra8888),
            other => Err(VnexError::unsupported_bit_depth(other)),
        }
    }
}

/// Pixel replacement policy for [`Image::overlay`].
///
/// Non-exhaustive so blending policies can be added without changing the
/// overlay signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OverlayKind {
    /// Destination pixels are fully replaced, including where the source is
    /// transparent.
    OverwriteAll,
}

/// A decoded image: dimensions, format, and the raw pixel buffer.
///
/// Invariant: `data.len() == width * height * bytes_per_pixel(format)`,
/// enforced at construction. Flip and overlay mutate in place; nothing else
/// does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Create a zero-filled canvas.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![0; len],
        }
    }

    /// Create an image from a raw pixel buffer.
    ///
    /// Fails with [`VnexError::BufferSizeMismatch`] when the buffer length
    /// does not match the dimensions; that is corrupt input, not a request
    /// to pad or truncate.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>, format: PixelFormat) -> Result<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(VnexError::buffer_size_mismatch(expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format tag.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return the raw pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Reverse the row order in place.
    pub fn flip_vertically(&mut self) {
        let stride = self.stride();
        if stride == 0 {
            return;
        }
        let mut row = vec![0u8; stride];
        let height = self.height as usize;
        for y in 0..height / 2 {
            let top = y * stride;
            let bottom = (height - 1 - y) * stride;
            row.copy_from_slice(&self.data[top..top + stride]);
            self.data.copy_within(bottom..bottom + stride, top);
            self.data[bottom..bottom + stride].copy_from_slice(&row);
        }
    }

    /// Copy `other`'s pixels into `self` at offset `(x, y)`, clipping to
    /// `self`'s bounds.
    ///
    /// Both images must share a pixel format.
    pub fn overlay(&mut self, other: &Image, x: i64, y: i64, kind: OverlayKind) -> Result<()> {
        if other.format != self.format {
            return Err(VnexError::not_supported(format!(
                "overlay between pixel formats {:?} and {:?}",
                other.format, self.format
            )));
        }
        let OverlayKind::OverwriteAll = kind;

        let bpp = self.format.bytes_per_pixel();
        let dst_stride = self.stride();
        let src_stride = other.stride();

        // Clip the source rectangle against the destination bounds.
        let src_x0 = (-x).max(0) as usize;
        let src_y0 = (-y).max(0) as usize;
        let dst_x0 = x.max(0) as usize;
        let dst_y0 = y.max(0) as usize;
        if dst_x0 >= self.width as usize || dst_y0 >= self.height as usize {
            return Ok(());
        }
        let cols = (other.width as usize)
            .saturating_sub(src_x0)
            .min(self.width as usize - dst_x0);
        let rows = (other.height as usize)
            .saturating_sub(src_y0)
            .min(self.height as usize - dst_y0);
        // An empty clip leaves no rows to copy; the source indices below
        // would be out of range for a fully-clipped rectangle.
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        for row in 0..rows {
            let src = (src_y0 + row) * src_stride + src_x0 * bpp;
            let dst = (dst_y0 + row) * dst_stride + dst_x0 * bpp;
            self.data[dst..dst + cols * bpp].copy_from_slice(&other.data[src..src + cols * bpp]);
        }
        Ok(())
    }
}
