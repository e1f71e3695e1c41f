//! Error types for codec operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all codec operations
#[derive(Debug)]
pub enum CodecError {
    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Codec parameter validation failed
    ///
    /// Covers non-divisible image dimensions, images smaller than one domain
    /// block, isometry ids outside 0..=7, and zero iteration counts. These
    /// are programming or input errors detected before any work starts.
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A deserialized model violates its own invariants
    ///
    /// Only reachable for models read from untrusted input; models produced
    /// by the encoder in-process always satisfy their invariants.
    MalformedModel {
        /// Description of the violated invariant
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::MalformedModel { reason } => {
                write!(f, "Malformed model: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for codec results
pub type Result<T> = std::result::Result<T, CodecError>;

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> CodecError {
    CodecError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed model error
pub fn malformed_model(reason: &impl ToString) -> CodecError {
    CodecError::MalformedModel {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{invalid_parameter, malformed_model};

    #[test]
    fn test_invalid_parameter_display() {
        let err = invalid_parameter("range_size", &0, &"must be at least 1");
        let message = err.to_string();
        assert!(message.contains("range_size"));
        assert!(message.contains("must be at least 1"));
    }

    #[test]
    fn test_malformed_model_display() {
        let err = malformed_model(&"code count 3 does not match 4 range blocks");
        assert!(err.to_string().starts_with("Malformed model"));
    }
}
