//! The fractal codec: encoding search, fixed-point decoding, and the code model

/// Fixed-point reconstruction from a code model
pub mod decoder;
/// Enumeration and sampling of candidate domain-block origins
pub mod domains;
/// Per-range-block search over domains, isometries, and affine fits
pub mod encoder;
/// Closed-form least-squares fitting of scale and offset
pub mod fitting;
/// The code model and its binary serialization
pub mod model;

pub use decoder::{SeedPolicy, decode};
pub use domains::{DomainIndex, SearchWindow};
pub use encoder::{EncoderConfig, encode};
pub use fitting::{AffineFit, fit_affine};
pub use model::{Code, Model};
