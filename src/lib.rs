//! # Chitra - Batch Image Effects
//!
//! Chitra applies a fixed catalog of deterministic visual filters to every
//! image in a directory, writing one output file per (image, filter) pair
//! and skipping work that has already been done.
//!
//! ## Features
//!
//! - **Fixed filter catalog**: contrast enhancement, thresholding, color
//!   quantization, stylization, edge effects, and geometric mirroring,
//!   registered once into an ordered registry
//! - **Idempotent batch runs**: the output file's existence is the
//!   completion record, so re-runs and resumed runs do no redundant work
//! - **Per-file error tolerance**: unreadable inputs and per-filter
//!   failures are reported in the run summary, never fatal
//! - **Deterministic output**: every filter is a pure function; the one
//!   randomized effect (vintage grain) takes an explicit seed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chitra::prelude::*;
//! use std::path::Path;
//!
//! let registry = FilterRegistry::with_builtins();
//! let runner = BatchRunner::new(registry);
//!
//! let summary = runner
//!     .run(Path::new("input_images"), Path::new("output_images"))
//!     .expect("directory setup failed");
//!
//! println!(
//!     "{} written, {} skipped",
//!     summary.outputs_written, summary.outputs_skipped
//! );
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error taxonomy and shared pixel helpers
//! - [`filters`]: the [`Filter`](filters::Filter) trait, the ordered
//!   registry, and the built-in catalog
//! - [`batch`]: the batch driver and its run summary
//!
//! ## Custom filters
//!
//! Implement the [`Filter`](filters::Filter) trait and register the
//! instance alongside the builtins:
//!
//! ```rust,ignore
//! use chitra::prelude::*;
//!
//! struct Negate;
//!
//! impl Filter for Negate {
//!     fn metadata(&self) -> FilterMetadata {
//!         FilterMetadata::new("negate", "Negate", Category::Color)
//!             .with_description("Invert every channel")
//!     }
//!
//!     fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
//!         let mut rgb = image.to_rgb8();
//!         for pixel in rgb.pixels_mut() {
//!             for channel in pixel.0.iter_mut() {
//!                 *channel = 255 - *channel;
//!             }
//!         }
//!         Ok(DynamicImage::ImageRgb8(rgb))
//!     }
//! }
//!
//! let mut registry = FilterRegistry::with_builtins();
//! registry.register(Negate);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod core;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use chitra::prelude::*;
/// ```
pub mod prelude {
    // Core types and errors
    pub use crate::core::error::{
        BatchError, ChitraError, ChitraResult, FilterError, FilterResult,
    };
    pub use crate::core::types::{has_recognized_extension, RECOGNIZED_EXTENSIONS};

    // Filters
    pub use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};

    // Built-in filters
    pub use crate::filters::builtin::{
        Anime, Clahe, Dream, Mirror, Neon, Posterize, Quantize, Sepia, Sketch, Threshold, Vintage,
    };

    // Batch driver
    pub use crate::batch::{BatchOptions, BatchRunner, FailureKind, PairFailure, RunSummary};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
