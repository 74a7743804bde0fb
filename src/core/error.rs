//! Error types for chitra.
//!
//! Uses thiserror for structured errors. The taxonomy follows the batch
//! driver's recovery policy:
//! - [`FilterError`]: a single filter rejected a single image; the pair is
//!   skipped and accounted in the run summary.
//! - [`BatchError`]: the batch itself cannot proceed (directory setup,
//!   bad filter subset); fatal for the whole run.
//! - [`ChitraError`]: umbrella type for library consumers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for chitra.
///
/// Encompasses all error categories and enables automatic conversion from
/// the specific error types.
#[derive(Error, Debug)]
pub enum ChitraError {
    /// A fatal batch setup error.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// A per-filter error.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// An I/O error outside the batch driver's per-file tolerance.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An image decode or encode error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A serialization error (e.g. JSON summary output).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from applying a single filter to a single image.
///
/// These are always recoverable at the batch level: the (image, filter)
/// pair is recorded as failed and the run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The image dimensions cannot support this filter's neighborhood
    /// operations (zero-area images, or images smaller than the minimum
    /// window the filter needs).
    #[error("filter '{filter}' cannot process a {width}x{height} image: {reason}")]
    InvalidDimensions {
        /// Id of the rejecting filter.
        filter: String,
        /// Input image width.
        width: u32,
        /// Input image height.
        height: u32,
        /// What the filter needed and did not get.
        reason: String,
    },
}

/// Fatal errors that abort the whole batch before or during setup.
///
/// Per-file and per-filter failures never surface here; if no work is
/// possible at all, one of these is returned instead of a summary.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input directory is missing or not a directory.
    #[error("input directory {path:?} does not exist or is not a directory")]
    InputDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path:?}: {source}")]
    OutputDirectory {
        /// The offending path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// Clean mode could not empty the output directory.
    #[error("failed to clean output directory {path:?}: {source}")]
    CleanFailed {
        /// The offending path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// An explicitly requested filter name is not in the registry.
    #[error("unknown filter '{name}' in requested subset")]
    UnknownFilter {
        /// The unrecognized name.
        name: String,
    },
}

/// Result type alias for chitra operations.
pub type ChitraResult<T> = Result<T, ChitraError>;

/// Result type alias for filter application.
pub type FilterResult<T> = Result<T, FilterError>;

/// Result type alias for batch runs.
pub type BatchResult<T> = Result<T, BatchError>;

impl FilterError {
    /// Convenience constructor for dimension rejections.
    pub fn invalid_dimensions(
        filter: &str,
        width: u32,
        height: u32,
        reason: impl Into<String>,
    ) -> Self {
        FilterError::InvalidDimensions {
            filter: filter.to_string(),
            width,
            height,
            reason: reason.into(),
        }
    }
}
