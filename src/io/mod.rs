//! Input/output operations: image loading, model files, CLI, progress display

/// Command-line interface for batch encode/decode runs
pub mod cli;
/// Codec constants and runtime configuration defaults
pub mod configuration;
/// Error types for codec operations
pub mod error;
/// Grayscale image loading and reconstruction export
pub mod image;
/// Multi-file progress tracking
pub mod progress;
