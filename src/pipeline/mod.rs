pub mod analyze;
pub mod extract;
pub mod hide;

use std::io::Cursor;

use anyhow::{Context, Result};
use image::ImageFormat;
use log::info;

use crate::crypto;
use crate::grid::{self, PixelGrid};

/// Result of a hide → PNG → extract roundtrip.
pub struct RoundtripResult {
    /// SHA-256 hex digest of the original secret.
    pub original_hash: String,
    /// SHA-256 hex digest of the recovered secret.
    pub recovered_hash: String,
    /// Name carried in the recovered envelope.
    pub recovered_name: String,
    /// `true` if the digests match.
    pub matched: bool,
}

/// Hide a secret, push the stego grid through an in-memory PNG encode and
/// decode, extract it again and compare digests.
///
/// # Example
///
/// ```rust
/// use bluecrypt::{roundtrip, PixelGrid};
///
/// let cover = PixelGrid::new(32, 32, [255, 255, 255]);
/// let result = roundtrip(&cover, "note.txt", b"hello", "hunter2").unwrap();
///
/// assert!(result.matched, "round-trip failed: {} != {}", result.original_hash, result.recovered_hash);
/// assert_eq!(result.recovered_name, "note.txt");
/// ```
pub fn roundtrip(
    cover: &PixelGrid,
    secret_name: &str,
    secret: &[u8],
    password: &str,
) -> Result<RoundtripResult> {
    let original_hash = hex_digest(secret);

    let hidden = hide::hide_bytes(cover, secret_name, secret, password)?;

    let mut png = Cursor::new(Vec::new());
    hidden
        .stego
        .into_image()?
        .write_to(&mut png, ImageFormat::Png)
        .context("failed to encode stego grid as PNG")?;
    let reloaded = grid::load_image_bytes(png.get_ref())?;

    let recovered = extract::extract_bytes(&reloaded, password)?;
    let recovered_hash = hex_digest(&recovered.data);
    let matched = original_hash == recovered_hash;
    info!("roundtrip verification: {}", if matched { "ok" } else { "MISMATCH" });

    Ok(RoundtripResult {
        original_hash,
        recovered_hash,
        recovered_name: recovered.filename,
        matched,
    })
}

fn hex_digest(data: &[u8]) -> String {
    crypto::sha256(data).iter().map(|b| format!("{:02x}", b)).collect()
}
