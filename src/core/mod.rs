//! Core types and errors for the chitra filter pipeline.
//!
//! This module contains the foundational pieces shared by the filter
//! catalog and the batch driver:
//! - Error types and result aliases
//! - The recognized image extension set and pixel-level helpers

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{BatchError, ChitraError, FilterError};
pub use types::{has_recognized_extension, RECOGNIZED_EXTENSIONS};
