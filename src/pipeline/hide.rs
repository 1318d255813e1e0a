use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::config::BlueCryptConfig;
use crate::crypto;
use crate::envelope;
use crate::grid::{self, PixelGrid};
use crate::quality;
use crate::stego;

/// Output of an in-memory hide.
#[derive(Debug, Clone)]
pub struct Hidden {
    pub stego: PixelGrid,
    /// Encrypted blob length, excluding the 4-byte length header.
    pub payload_len: usize,
    pub capacity: usize,
    /// PSNR of the stego grid against the cover, in dB.
    pub psnr: f64,
}

/// Summary of a file-based hide.
#[derive(Debug, Clone)]
pub struct HideReport {
    pub secret_name: String,
    pub secret_len: usize,
    pub payload_len: usize,
    pub capacity: usize,
    pub psnr: f64,
    pub meets_target: bool,
}

/// Pack, encrypt and embed a secret into a copy of `cover`.
pub fn hide_bytes(
    cover: &PixelGrid,
    secret_name: &str,
    secret: &[u8],
    password: &str,
) -> Result<Hidden> {
    let key = crypto::derive_key(password)?;
    let envelope = envelope::pack(secret_name, secret)?;
    let blob = crypto::encrypt(&envelope, &key).context("failed to encrypt secret")?;
    debug!("envelope {} bytes, encrypted {} bytes", envelope.len(), blob.len());

    let stego = stego::embed(cover, &blob)?;
    let psnr = quality::psnr(cover, &stego)?;

    Ok(Hidden {
        stego,
        payload_len: blob.len(),
        capacity: stego::capacity(cover),
        psnr,
    })
}

/// Full hide pipeline: cover image + secret file -> lossless stego image.
pub fn hide_file(
    cover_path: &Path,
    secret_path: &Path,
    output_path: &Path,
    password: &str,
    cfg: &BlueCryptConfig,
) -> Result<HideReport> {
    grid::lossless_format(output_path)?;
    if output_path.exists() && !cfg.overwrite {
        bail!(
            "output {} already exists (pass --force to overwrite)",
            output_path.display()
        );
    }

    info!("loading cover image: {}", cover_path.display());
    let cover = grid::load_image(cover_path)?;

    info!("reading secret file: {}", secret_path.display());
    let secret = fs::read(secret_path)
        .with_context(|| format!("failed to read secret file {}", secret_path.display()))?;
    let secret_name = secret_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let hidden = hide_bytes(&cover, &secret_name, &secret, password)?;
    info!(
        "embedded {} of {} available bytes, PSNR {:.2} dB",
        hidden.payload_len, hidden.capacity, hidden.psnr
    );

    let meets_target = hidden.psnr > cfg.psnr_target_db;
    if !meets_target {
        warn!(
            "PSNR {:.2} dB is below the {:.2} dB imperceptibility target",
            hidden.psnr, cfg.psnr_target_db
        );
    }

    info!("writing stego image: {}", output_path.display());
    grid::save_image(&hidden.stego, output_path)?;

    Ok(HideReport {
        secret_name: envelope::basename(&secret_name).to_string(),
        secret_len: secret.len(),
        payload_len: hidden.payload_len,
        capacity: hidden.capacity,
        psnr: hidden.psnr,
        meets_target,
    })
}
