//! Pure geometric operations on pixel blocks

/// The eight symmetries of the square
pub mod isometry;
/// Block extraction and 2x2 average-pool downsampling
pub mod sampling;

pub use isometry::Isometry;
pub use sampling::downsample2x;
