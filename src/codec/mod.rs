//! The fixed 2:2:4 channel split.
//!
//! Each payload byte is spread over one RGB pixel: bits 7-6 go into the two
//! low bits of red, bits 5-4 into the two low bits of green and bits 3-0 into
//! the four low bits of blue. High bits of every channel are preserved.

use rayon::prelude::*;

pub const CHANNELS: usize = 3;

pub const RED_KEEP: u8 = 0xFC;
pub const GREEN_KEEP: u8 = 0xFC;
pub const BLUE_KEEP: u8 = 0xF0;

/// Split a byte into its (red, green, blue) bit groups.
pub fn split_byte(byte: u8) -> (u8, u8, u8) {
    ((byte >> 6) & 0x03, (byte >> 4) & 0x03, byte & 0x0F)
}

/// Reassemble a byte from (red, green, blue) bit groups.
pub fn join_bits(red: u8, green: u8, blue: u8) -> u8 {
    ((red & 0x03) << 6) | ((green & 0x03) << 4) | (blue & 0x0F)
}

/// Overwrite the low bits of one RGB pixel with `byte`.
pub fn embed_byte(pixel: &mut [u8], byte: u8) {
    let (r, g, b) = split_byte(byte);
    pixel[0] = (pixel[0] & RED_KEEP) | r;
    pixel[1] = (pixel[1] & GREEN_KEEP) | g;
    pixel[2] = (pixel[2] & BLUE_KEEP) | b;
}

/// Read the byte carried by one RGB pixel.
pub fn decode_pixel(pixel: &[u8]) -> u8 {
    join_bits(pixel[0], pixel[1], pixel[2])
}

/// Embed `bytes` into consecutive pixels of a packed RGB buffer, one byte per
/// pixel starting at pixel 0. Pixels past `bytes.len()` are left untouched.
///
/// `pixels` must hold at least `bytes.len()` whole pixels.
pub fn encode_into(pixels: &mut [u8], bytes: &[u8]) {
    let span = bytes.len() * CHANNELS;
    pixels[..span]
        .par_chunks_exact_mut(CHANNELS)
        .zip(bytes.par_iter())
        .for_each(|(pixel, &byte)| embed_byte(pixel, byte));
}

/// Decode one byte from each whole pixel of a packed RGB buffer.
pub fn decode_from(pixels: &[u8]) -> Vec<u8> {
    pixels
        .par_chunks_exact(CHANNELS)
        .map(decode_pixel)
        .collect()
}
