//! Fractal image codec in the style of Fisher's partitioned iterated function systems
//!
//! Encodes a grayscale image as one affine self-similarity transform per range
//! block and reconstructs an approximation by iterating those transforms from
//! a seed image toward the codec's attractor.

/// Encoder, decoder, affine fitting, domain search, and the code model
pub mod codec;
/// Block downsampling and the eight square isometries
pub mod geometry;
/// Input/output operations and error handling
pub mod io;
/// Reconstruction fidelity metrics
pub mod metrics;

pub use io::error::{CodecError, Result};
