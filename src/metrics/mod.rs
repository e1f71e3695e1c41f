//! Reconstruction fidelity metrics

/// Mean squared error and peak signal-to-noise ratio
pub mod fidelity;

pub use fidelity::{mse, psnr};
