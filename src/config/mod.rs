pub const MAGIC: &[u8; 4] = b"BCP1";

// Envelope layout: magic(4) || name_len(2, BE) || name || data
pub const NAME_LEN_SIZE: usize = 2;
pub const ENVELOPE_HEADER_SIZE: usize = MAGIC.len() + NAME_LEN_SIZE;
pub const MAX_NAME_LEN: usize = u16::MAX as usize;
pub const DEFAULT_SECRET_NAME: &str = "secret.bin";
pub const DEFAULT_EXTRACTED_NAME: &str = "extracted_secret.bin";

// AES-256-GCM
pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const ENCRYPTION_OVERHEAD: usize = NONCE_LEN + TAG_LEN;

// Stego stream: length(4, BE) || encrypted blob
pub const HEADER_LEN: usize = 4;

/// Extensions whose encoders preserve every channel value exactly.
pub const LOSSLESS_EXTENSIONS: [&str; 4] = ["png", "bmp", "tif", "tiff"];

/// PSNR above which the stego image is considered visually indistinguishable.
pub const DEFAULT_PSNR_TARGET_DB: f64 = 55.0;

/// Bytes of encrypted payload a `width` x `height` image can carry.
///
/// The 2:2:4 split stores one byte per pixel; the first four pixels hold the
/// length header.
pub fn capacity(width: u32, height: u32) -> usize {
    (width as usize * height as usize).saturating_sub(HEADER_LEN)
}

/// Largest secret file that fits once envelope and AEAD overhead are paid.
pub fn max_secret_size(width: u32, height: u32, name_len: usize) -> usize {
    capacity(width, height).saturating_sub(ENCRYPTION_OVERHEAD + ENVELOPE_HEADER_SIZE + name_len)
}

/// Returns true when `ext` names a format listed in [`LOSSLESS_EXTENSIONS`].
pub fn is_lossless_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    LOSSLESS_EXTENSIONS.iter().any(|e| *e == ext)
}

/// Runtime configuration for the file pipelines.
#[derive(Debug, Clone)]
pub struct BlueCryptConfig {
    pub psnr_target_db: f64,
    pub overwrite: bool,
}

impl Default for BlueCryptConfig {
    fn default() -> Self {
        Self {
            psnr_target_db: DEFAULT_PSNR_TARGET_DB,
            overwrite: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_reserves_header() {
        assert_eq!(capacity(10, 10), 96);
        assert_eq!(capacity(2, 2), 0);
        assert_eq!(capacity(1, 1), 0);
        assert_eq!(capacity(0, 100), 0);
    }

    #[test]
    fn test_max_secret_size() {
        // 96 - 28 - 6 - 8
        assert_eq!(max_secret_size(10, 10, "note.txt".len()), 54);
        assert_eq!(max_secret_size(3, 3, 8), 0);
    }

    #[test]
    fn test_lossless_extensions() {
        assert!(is_lossless_extension("png"));
        assert!(is_lossless_extension("TIFF"));
        assert!(!is_lossless_extension("jpg"));
        assert!(!is_lossless_extension("webp"));
    }
}
