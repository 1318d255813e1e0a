//! Owned RGB pixel grids and the image file boundary.
//!
//! Every image entering the crate is flattened to 8-bit RGB; an alpha channel,
//! if present, is dropped. Output is only ever written to lossless formats.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::debug;
use thiserror::Error;

use crate::codec::CHANNELS;
use crate::config;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("unsupported image file: {0}")]
    UnsupportedImage(String),
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSize { expected: usize, got: usize },
    #[error("refusing to write lossy or unknown format {0:?}: use png, bmp or tiff")]
    LossyFormat(String),
    #[error("failed to save image: {0}")]
    Save(String),
}

/// A row-major grid of RGB pixels held in one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// A grid with every channel of every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: [u8; CHANNELS]) -> Self {
        let pixels = width as usize * height as usize;
        let data = fill.iter().copied().cycle().take(pixels * CHANNELS).collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap a packed RGB buffer of exactly `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(GridError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Channel value at (`row`, `col`, `channel`).
    ///
    /// Panics if any index is out of range.
    pub fn get(&self, row: u32, col: u32, channel: usize) -> u8 {
        assert!(row < self.height && col < self.width && channel < CHANNELS);
        self.data[self.offset(row, col) + channel]
    }

    pub fn pixel(&self, row: u32, col: u32) -> [u8; CHANNELS] {
        assert!(row < self.height && col < self.width);
        let off = self.offset(row, col);
        [self.data[off], self.data[off + 1], self.data[off + 2]]
    }

    pub fn set_pixel(&mut self, row: u32, col: u32, rgb: [u8; CHANNELS]) {
        assert!(row < self.height && col < self.width);
        let off = self.offset(row, col);
        self.data[off..off + CHANNELS].copy_from_slice(&rgb);
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Convert into an `image` buffer for encoding.
    pub fn into_image(self) -> Result<RgbImage, GridError> {
        let expected = self.data.len();
        RgbImage::from_raw(self.width, self.height, self.data).ok_or(GridError::BufferSize {
            expected,
            got: expected,
        })
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        (row as usize * self.width as usize + col as usize) * CHANNELS
    }
}

impl From<RgbImage> for PixelGrid {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// Decode an image file of any supported format into an RGB grid.
pub fn load_image(path: &Path) -> Result<PixelGrid, GridError> {
    let img = image::open(path)
        .map_err(|e| GridError::UnsupportedImage(format!("{}: {}", path.display(), e)))?;
    debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_rgb8().into())
}

/// Decode an in-memory image into an RGB grid.
pub fn load_image_bytes(bytes: &[u8]) -> Result<PixelGrid, GridError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| GridError::UnsupportedImage(e.to_string()))?;
    Ok(img.to_rgb8().into())
}

/// Pick the lossless encoder for `path`, rejecting anything else.
pub fn lossless_format(path: &Path) -> Result<ImageFormat, GridError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !config::is_lossless_extension(&ext) {
        return Err(GridError::LossyFormat(ext));
    }
    ImageFormat::from_extension(&ext).ok_or(GridError::LossyFormat(ext))
}

/// Write a grid to a lossless image file.
pub fn save_image(grid: &PixelGrid, path: &Path) -> Result<(), GridError> {
    let format = lossless_format(path)?;
    let img = grid.clone().into_image()?;
    img.save_with_format(path, format)
        .map_err(|e| GridError::Save(format!("{}: {}", path.display(), e)))?;
    debug!("saved {} as {:?}", path.display(), format);
    Ok(())
}
