//! Mean squared error and PSNR between equal-shaped images
//!
//! Samples are normalized to [0, 1], so the PSNR peak value is 1 and the
//! metric reduces to `10*log10(1/mse)`.

use crate::io::error::{Result, invalid_parameter};
use ndarray::Array2;

/// Reported PSNR for a numerically zero error, instead of infinity
pub const PSNR_CEILING: f64 = 99.0;

/// Errors below this are treated as zero for PSNR purposes
pub const MSE_FLOOR: f64 = 1e-12;

/// Mean squared error between two equal-shaped images
///
/// # Errors
///
/// Returns an error if the image shapes differ
pub fn mse(a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(invalid_parameter(
            "images",
            &format!("{:?} vs {:?}", a.dim(), b.dim()),
            &"shapes must match",
        ));
    }

    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).powi(2))
        .sum();
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio in decibels between two equal-shaped images
///
/// Near-zero error returns the fixed ceiling [`PSNR_CEILING`] rather than an
/// unbounded value.
///
/// # Errors
///
/// Returns an error if the image shapes differ
pub fn psnr(a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
    let error = mse(a, b)?;
    if error < MSE_FLOOR {
        return Ok(PSNR_CEILING);
    }
    Ok(10.0 * (1.0 / error).log10())
}
