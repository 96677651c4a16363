//! The rendered image: a buffer of linear RGB triples.
//!
//! Pixels are stored row-major, top row first, in linear (pre-gamma)
//! space. Encoding to 8 bits happens only on the way out, for PNG files,
//! for presentation and for checksums.

use std::hash::Hasher;
use std::path::Path;
use std::slice::ChunksMut;

use fnv::FnvHasher;
use forkray_math::Vec3;
use thiserror::Error;

/// Gamma used when encoding linear values to 8 bits.
pub const DISPLAY_GAMMA: f64 = 2.2;

/// Errors raised while allocating or writing an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },

    #[error("Failed to allocate {0} pixels")]
    Allocation(usize),

    #[error("Pixel count {actual} does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, actual: usize },

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Gamma-encode one linear channel value to 8 bits.
///
/// `clip(linear^(1/2.2)) * 255 + 0.5`, truncated. Negative and NaN input
/// encode as 0.
#[inline]
pub fn encode_channel(linear: f64) -> u8 {
    let encoded = linear.powf(1.0 / DISPLAY_GAMMA).clamp(0.0, 1.0);
    (encoded * 255.0 + 0.5) as u8
}

/// A width x height buffer of linear RGB values.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Image {
    /// Allocate a black image.
    ///
    /// Fails instead of aborting when the buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> ImageResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(ImageError::TooLarge { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| ImageError::Allocation(len))?;
        pixels.resize(len, Vec3::ZERO);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap existing pixels (row-major, top row first).
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> ImageResult<Self> {
        if (width as usize).checked_mul(height as usize) != Some(pixels.len()) {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Disjoint mutable rows, top row first. Empty for a zero-sized image.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Vec3> {
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    /// Gamma-encoded RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&[
                encode_channel(color.x),
                encode_channel(color.y),
                encode_channel(color.z),
            ]);
        }
        bytes
    }

    /// Gamma-encoded pixels packed as `0x00RRGGBB`.
    ///
    /// On little-endian machines the bytes of each word read blue, green,
    /// red, unused, which is what X11-style 32-bit visuals expect.
    pub fn to_bgrx(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|c| {
                let r = encode_channel(c.x) as u32;
                let g = encode_channel(c.y) as u32;
                let b = encode_channel(c.z) as u32;
                (r << 16) | (g << 8) | b
            })
            .collect()
    }

    /// [`Image::to_bgrx`] as raw bytes in native word order.
    pub fn bgrx_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_bgrx()).to_vec()
    }

    /// Write an 8-bit RGB PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// FNV-1a hash of the gamma-encoded bytes.
    ///
    /// Two renders that would produce byte-identical files have the same
    /// checksum.
    pub fn checksum(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        hasher.write(&self.to_rgb8());
        hasher.finish()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
