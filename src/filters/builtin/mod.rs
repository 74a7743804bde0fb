//! Built-in filter implementations.
//!
//! This module contains the fixed filter catalog that ships with chitra.
//! Registration order here is the order the batch driver applies filters
//! and the order they appear in logs and listings.

mod blur;
mod color;
mod contrast;
mod stylize;
mod transform;

use crate::filters::registry::FilterRegistry;

/// Register the full built-in catalog.
pub fn register_all(registry: &mut FilterRegistry) {
    color::register(registry);
    contrast::register(registry);
    blur::register(registry);
    stylize::register(registry);
    transform::register(registry);
}

// Re-export for direct access
pub use blur::Dream;
pub use color::{Posterize, Sepia, Vintage};
pub use contrast::{Clahe, Threshold};
pub use stylize::{Anime, Neon, Quantize, Sketch};
pub use transform::Mirror;
