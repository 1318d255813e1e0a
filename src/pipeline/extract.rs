use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info};

use crate::config::{BlueCryptConfig, DEFAULT_EXTRACTED_NAME};
use crate::crypto;
use crate::envelope::{self, SecretFile};
use crate::grid::{self, PixelGrid};
use crate::stego;

/// Extract, decrypt and unpack the secret hidden in `stego_grid`.
pub fn extract_bytes(stego_grid: &PixelGrid, password: &str) -> Result<SecretFile> {
    let key = crypto::derive_key(password)?;
    let blob = stego::extract(stego_grid)?;
    debug!("extracted {} encrypted bytes", blob.len());

    let envelope = crypto::decrypt(&blob, &key)?;
    Ok(envelope::unpack(&envelope)?)
}

/// File name safe to join onto an output directory.
fn safe_file_name(name: &str) -> &str {
    match envelope::basename(name) {
        "" | "." | ".." => DEFAULT_EXTRACTED_NAME,
        base => base,
    }
}

/// Full extract pipeline: stego image -> recovered secret file on disk.
///
/// `output` may name a file, or an existing directory in which case the
/// recovered name is used inside it. Returns the path written.
pub fn extract_file(
    stego_path: &Path,
    output: &Path,
    password: &str,
    cfg: &BlueCryptConfig,
) -> Result<PathBuf> {
    info!("loading stego image: {}", stego_path.display());
    let stego_grid = grid::load_image(stego_path)?;

    let secret = extract_bytes(&stego_grid, password)?;
    info!("recovered {} ({} bytes)", secret.filename, secret.data.len());

    let target = if output.is_dir() {
        output.join(safe_file_name(&secret.filename))
    } else {
        output.to_path_buf()
    };
    if target.exists() && !cfg.overwrite {
        bail!(
            "output {} already exists (pass --force to overwrite)",
            target.display()
        );
    }

    fs::write(&target, &secret.data)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!("extract complete! output: {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("note.txt"), "note.txt");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name(".."), DEFAULT_EXTRACTED_NAME);
        assert_eq!(safe_file_name("dir/"), DEFAULT_EXTRACTED_NAME);
    }
}
