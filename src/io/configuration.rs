//! Codec constants and runtime configuration defaults

// Block geometry defaults; domain blocks are always twice the range size
/// Default side length of a range block
pub const DEFAULT_RANGE_SIZE: usize = 8;
/// Default step between candidate domain origins
pub const DEFAULT_DOMAIN_STRIDE: usize = 4;

// Search breadth defaults; both trade fidelity for encode speed
/// Default per-axis search window radius in pixels
pub const DEFAULT_WINDOW_RADIUS: usize = 64;
/// Default cap on candidate domains per range block
pub const DEFAULT_MAX_DOMAINS: usize = 800;

/// Default number of decode iterations
pub const DEFAULT_DECODE_ITERATIONS: usize = 10;

/// Fixed seed for reproducible runs
pub const DEFAULT_SEED: u64 = 42;

/// Default square working size images are resized to before encoding
pub const DEFAULT_IMAGE_SIZE: usize = 256;

// Output settings
/// Suffix added to reconstruction filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// File extension for serialized models
pub const MODEL_EXTENSION: &str = "frm";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
