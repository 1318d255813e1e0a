use byteorder::{BigEndian, ByteOrder};
use log::debug;
use thiserror::Error;

use crate::codec::{self, CHANNELS};
use crate::config::{self, HEADER_LEN};
use crate::grid::PixelGrid;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("encrypted payload is empty")]
    EmptyPayload,
    #[error("insufficient image capacity: need {required} bytes, but only {available} bytes available")]
    CapacityExceeded { required: usize, available: usize },
    #[error("image is too small to contain a payload header: {pixels} pixels")]
    ImageTooSmall { pixels: usize },
    #[error("image does not contain a valid payload (declared length {0})")]
    InvalidPayload(u32),
}

/// Payload bytes a grid can carry after the length header.
pub fn capacity(grid: &PixelGrid) -> usize {
    config::capacity(grid.width(), grid.height())
}

/// Hide `blob` in a copy of `grid`.
///
/// The stream `length(4, BE) || blob` is written one byte per pixel in
/// row-major order from pixel 0. Pixels past the stream keep their values.
pub fn embed(grid: &PixelGrid, blob: &[u8]) -> Result<PixelGrid, StegoError> {
    if blob.is_empty() {
        return Err(StegoError::EmptyPayload);
    }

    let available = capacity(grid);
    if blob.len() > available || blob.len() > u32::MAX as usize {
        return Err(StegoError::CapacityExceeded {
            required: blob.len(),
            available,
        });
    }

    let mut stream = vec![0u8; HEADER_LEN];
    BigEndian::write_u32(&mut stream, blob.len() as u32);
    stream.extend_from_slice(blob);

    let mut stego = grid.clone();
    codec::encode_into(stego.as_raw_mut(), &stream);
    debug!(
        "embedded {} bytes into {}x{} grid ({} bytes free)",
        stream.len(),
        grid.width(),
        grid.height(),
        available - blob.len()
    );
    Ok(stego)
}

/// Recover the blob previously hidden with [`embed`].
pub fn extract(grid: &PixelGrid) -> Result<Vec<u8>, StegoError> {
    let pixels = grid.pixel_count();
    if pixels <= HEADER_LEN {
        return Err(StegoError::ImageTooSmall { pixels });
    }

    let raw = grid.as_raw();
    let header = codec::decode_from(&raw[..HEADER_LEN * CHANNELS]);
    let declared = BigEndian::read_u32(&header);
    let len = declared as usize;
    if len == 0 || len > pixels - HEADER_LEN {
        return Err(StegoError::InvalidPayload(declared));
    }

    debug!("extracting {} payload bytes", len);
    let start = HEADER_LEN * CHANNELS;
    Ok(codec::decode_from(&raw[start..start + len * CHANNELS]))
}
