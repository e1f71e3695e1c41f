//! Closed-form least-squares fitting of a domain block onto a range block
//!
//! One free scale parameter plus an additive offset; the offset always zeroes
//! the residual mean given the chosen scale, so this is the exact ordinary
//! least squares solution, not an iterative fit.

use ndarray::ArrayView2;

/// Scale factors are clamped to this magnitude
///
/// The decoder's fixed-point iteration relies on bounded scale factors for
/// contraction, so this bound must not be widened.
pub const SCALE_CLAMP: f64 = 1.0;

/// Domain variance below this is treated as constant, forcing scale to zero
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// Result of fitting a transformed domain block against a range block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineFit {
    /// Multiplicative factor, clamped to [-1, 1]
    pub scale: f64,
    /// Additive offset, unconstrained
    pub offset: f64,
    /// Mean squared residual of the fit
    pub mse: f64,
}

/// Fit `scale * domain + offset` to the range block by least squares
///
/// Both blocks must have the same shape; the codec guarantees this by
/// downsampling every domain block to range size before fitting. Population
/// statistics over all pixels; a near-constant domain forces scale to zero
/// rather than dividing by a vanishing variance.
pub fn fit_affine(domain: &ArrayView2<'_, f64>, range: &ArrayView2<'_, f64>) -> AffineFit {
    let count = domain.len() as f64;
    let domain_mean = domain.iter().sum::<f64>() / count;
    let range_mean = range.iter().sum::<f64>() / count;

    let variance = domain
        .iter()
        .map(|&d| (d - domain_mean).powi(2))
        .sum::<f64>()
        / count;

    let scale = if variance < VARIANCE_FLOOR {
        0.0
    } else {
        let covariance = domain
            .iter()
            .zip(range.iter())
            .map(|(&d, &r)| (d - domain_mean) * (r - range_mean))
            .sum::<f64>()
            / count;
        (covariance / variance).clamp(-SCALE_CLAMP, SCALE_CLAMP)
    };

    let offset = scale.mul_add(-domain_mean, range_mean);

    let mse = domain
        .iter()
        .zip(range.iter())
        .map(|(&d, &r)| (scale.mul_add(d, offset) - r).powi(2))
        .sum::<f64>()
        / count;

    AffineFit { scale, offset, mse }
}
