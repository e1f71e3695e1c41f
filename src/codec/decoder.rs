//! Fixed-point reconstruction by iterated application of the code model
//!
//! Each iteration reads every domain block from a frozen snapshot of the
//! current image and writes the transformed result into a fresh buffer, so
//! all codes within one iteration see consistent input. The operator is
//! contractive thanks to the bounded scale factors, and the iterates approach
//! the model's attractor; the contract here is simply "apply exactly
//! `n_iters` iterations".

use crate::codec::model::Model;
use crate::geometry::downsample2x;
use crate::io::error::{Result, invalid_parameter, malformed_model};
use ndarray::{Array2, s};
use rand::Rng;
use rand::rngs::StdRng;

/// How the decoder initializes its working image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Every sample starts at 0.5
    Flat,
    /// Every sample drawn uniformly from [0, 1]
    Random,
}

impl SeedPolicy {
    /// Build the initial working image for a decode run
    ///
    /// The flat policy never touches the rng, so decodes with it are
    /// reproducible regardless of the seed.
    pub fn initial_image(self, height: usize, width: usize, rng: &mut StdRng) -> Array2<f64> {
        match self {
            Self::Flat => Array2::from_elem((height, width), 0.5),
            Self::Random => Array2::from_shape_fn((height, width), |_| rng.random::<f64>()),
        }
    }
}

/// Reconstruct an image by applying the model's codes `n_iters` times
///
/// Every range-block write is clamped to [0, 1], so each iterate stays a
/// valid image.
///
/// # Errors
///
/// Returns an error if `n_iters` is zero
pub fn decode(
    model: &Model,
    n_iters: usize,
    seed_policy: SeedPolicy,
    rng: &mut StdRng,
) -> Result<Array2<f64>> {
    decode_with_observer(model, n_iters, seed_policy, rng, |_, _| {})
}

/// Decode with a per-iteration progress callback
///
/// The observer receives `(completed_iterations, n_iters)` after each full
/// pass over the range grid; the CLI uses it to drive progress bars.
///
/// # Errors
///
/// Same conditions as [`decode`]
pub fn decode_with_observer(
    model: &Model,
    n_iters: usize,
    seed_policy: SeedPolicy,
    rng: &mut StdRng,
    mut observer: impl FnMut(usize, usize),
) -> Result<Array2<f64>> {
    if n_iters == 0 {
        return Err(invalid_parameter(
            "n_iters",
            &n_iters,
            &"at least one iteration is required",
        ));
    }

    let rsize = model.range_size();
    let dsize = 2 * rsize;
    let mut current = seed_policy.initial_image(model.height(), model.width(), rng);

    for iteration in 0..n_iters {
        let mut next = Array2::zeros(current.dim());

        for range_row in 0..model.grid_rows() {
            for range_col in 0..model.grid_cols() {
                let code = model
                    .code_at(range_row, range_col)
                    .ok_or_else(|| malformed_model(&"missing code for range block"))?;

                let y = code.domain_y as usize;
                let x = code.domain_x as usize;
                let domain_block = current.slice(s![y..y + dsize, x..x + dsize]);
                let pooled = downsample2x(&domain_block)?;
                let transformed = code.isometry.apply(&pooled.view());

                let approximation =
                    transformed.mapv(|d| code.scale.mul_add(d, code.offset).clamp(0.0, 1.0));

                let out_y = range_row * rsize;
                let out_x = range_col * rsize;
                next.slice_mut(s![out_y..out_y + rsize, out_x..out_x + rsize])
                    .assign(&approximation);
            }
        }

        current = next;
        observer(iteration + 1, n_iters);
    }

    Ok(current)
}
