//! Per-range-block search for the best self-similarity transform
//!
//! For every non-overlapping range block the encoder scans candidate domain
//! blocks, downsamples each to range size, tries all eight isometries, and
//! keeps the single fit with the lowest mean squared error. Range blocks are
//! independent of one another; they only read the shared source image.

use crate::codec::domains::{DomainIndex, SearchWindow};
use crate::codec::fitting::fit_affine;
use crate::codec::model::{Code, Model};
use crate::geometry::{Isometry, downsample2x};
use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array2, s};
use rand::rngs::StdRng;

/// Encoder parameters controlling block sizes and search breadth
#[derive(Debug, Clone, Copy)]
pub struct EncoderConfig {
    /// Side length of a range block; image dimensions must be divisible by it
    pub range_size: usize,
    /// Step between candidate domain origins in both axes
    pub domain_stride: usize,
    /// Restrict candidates to this per-axis center distance when set
    pub window_radius: Option<usize>,
    /// Randomly subsample candidates down to this many when set
    pub max_domains_per_range: Option<usize>,
}

/// Running best candidate for one range block
///
/// Starts at infinite error so the first finite fit always wins; later fits
/// only replace it on strictly lower error, so first-seen wins ties under the
/// deterministic candidate and isometry enumeration order.
#[derive(Debug, Clone, Copy)]
struct BestMatch {
    mse: f64,
    domain_y: usize,
    domain_x: usize,
    isometry: Isometry,
    scale: f64,
    offset: f64,
}

impl BestMatch {
    const fn new() -> Self {
        Self {
            mse: f64::INFINITY,
            domain_y: 0,
            domain_x: 0,
            isometry: Isometry::Identity,
            scale: 0.0,
            offset: 0.0,
        }
    }

    const fn consider(
        &mut self,
        mse: f64,
        domain_y: usize,
        domain_x: usize,
        isometry: Isometry,
        scale: f64,
        offset: f64,
    ) {
        if mse < self.mse {
            *self = Self {
                mse,
                domain_y,
                domain_x,
                isometry,
                scale,
                offset,
            };
        }
    }

    const fn into_code(self) -> Code {
        Code {
            domain_y: self.domain_y as u32,
            domain_x: self.domain_x as u32,
            isometry: self.isometry,
            scale: self.scale,
            offset: self.offset,
        }
    }
}

/// Encode an image into a fractal code model
///
/// The rng drives candidate subsampling only; with
/// `max_domains_per_range = None` the search is fully deterministic.
///
/// # Errors
///
/// Returns an error if the image dimensions are not divisible by the range
/// size, the image is smaller than one domain block, or a size parameter is
/// zero
pub fn encode(image: &Array2<f64>, config: &EncoderConfig, rng: &mut StdRng) -> Result<Model> {
    encode_with_observer(image, config, rng, |_, _| {})
}

/// Encode with a per-block progress callback
///
/// The observer receives `(completed_blocks, total_blocks)` after each range
/// block is coded; the CLI uses it to drive progress bars.
///
/// # Errors
///
/// Same conditions as [`encode`]
pub fn encode_with_observer(
    image: &Array2<f64>,
    config: &EncoderConfig,
    rng: &mut StdRng,
    mut observer: impl FnMut(usize, usize),
) -> Result<Model> {
    let (height, width) = image.dim();
    let rsize = config.range_size;

    let index = DomainIndex::build(height, width, rsize, config.domain_stride)?;
    let dsize = index.domain_size();

    if height % rsize != 0 || width % rsize != 0 {
        return Err(invalid_parameter(
            "image",
            &format!("{height}x{width}"),
            &format!("dimensions must be divisible by range size {rsize}"),
        ));
    }

    let grid_rows = height / rsize;
    let grid_cols = width / rsize;
    let total_blocks = grid_rows * grid_cols;

    let mut codes = Vec::with_capacity(total_blocks);
    for range_row in 0..grid_rows {
        for range_col in 0..grid_cols {
            let y = range_row * rsize;
            let x = range_col * rsize;
            let range_block = image.slice(s![y..y + rsize, x..x + rsize]);

            let window = config.window_radius.map(|radius| SearchWindow {
                center: [y + rsize / 2, x + rsize / 2],
                radius,
            });
            let candidates =
                index.candidates(window.as_ref(), config.max_domains_per_range, rng);

            let mut best = BestMatch::new();
            for origin in candidates {
                let domain_block =
                    image.slice(s![origin[0]..origin[0] + dsize, origin[1]..origin[1] + dsize]);
                let pooled = downsample2x(&domain_block)?;

                for isometry in Isometry::ALL {
                    let transformed = isometry.apply(&pooled.view());
                    let fit = fit_affine(&transformed.view(), &range_block);
                    best.consider(
                        fit.mse,
                        origin[0],
                        origin[1],
                        isometry,
                        fit.scale,
                        fit.offset,
                    );
                }
            }

            codes.push(best.into_code());
            observer(codes.len(), total_blocks);
        }
    }

    Model::new(height, width, rsize, config.domain_stride, codes)
}
