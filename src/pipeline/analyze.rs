use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::BlueCryptConfig;
use crate::grid;
use crate::quality;

/// PSNR comparison of two images.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeReport {
    pub psnr: f64,
    pub meets_target: bool,
}

/// Compare an original image against a modified one.
pub fn analyze_files(
    original_path: &Path,
    modified_path: &Path,
    cfg: &BlueCryptConfig,
) -> Result<AnalyzeReport> {
    let original = grid::load_image(original_path)?;
    let modified = grid::load_image(modified_path)?;

    let psnr = quality::psnr(&original, &modified).with_context(|| {
        format!(
            "cannot compare {} with {}",
            original_path.display(),
            modified_path.display()
        )
    })?;
    info!("PSNR {:.2} dB", psnr);

    Ok(AnalyzeReport {
        psnr,
        meets_target: psnr > cfg.psnr_target_db,
    })
}
