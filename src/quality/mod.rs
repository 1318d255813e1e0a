use rayon::prelude::*;
use thiserror::Error;

use crate::grid::PixelGrid;

#[derive(Error, Debug)]
pub enum QualityError {
    #[error("PSNR requires images of identical dimensions: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },
}

const PEAK: f64 = 255.0;

/// Mean squared error over every channel value of two same-sized grids.
pub fn mse(a: &PixelGrid, b: &PixelGrid) -> Result<f64, QualityError> {
    if a.dimensions() != b.dimensions() {
        return Err(QualityError::DimensionMismatch {
            a_width: a.width(),
            a_height: a.height(),
            b_width: b.width(),
            b_height: b.height(),
        });
    }

    let samples = a.as_raw().len();
    if samples == 0 {
        return Ok(0.0);
    }

    // Squared differences are summed exactly as integers, so the result does
    // not depend on how rayon splits the work.
    let sum: u64 = a
        .as_raw()
        .par_iter()
        .zip(b.as_raw().par_iter())
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d * d
        })
        .sum();

    Ok(sum as f64 / samples as f64)
}

/// Peak signal-to-noise ratio in dB. Identical grids give `f64::INFINITY`.
pub fn psnr(a: &PixelGrid, b: &PixelGrid) -> Result<f64, QualityError> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(20.0 * (PEAK / mse.sqrt()).log10())
}
