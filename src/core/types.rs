//! Shared value types and pixel helpers.
//!
//! Images flow through the pipeline as [`image::DynamicImage`]. The channel
//! convention everywhere in this crate is RGB, the `image` crate's native
//! sample order; filters that hard-code channel constants (sepia, vintage,
//! neon) document their triples in that order. Filters never mutate their
//! input: every application allocates a fresh buffer, possibly with a
//! different channel count or width.

use crate::core::error::{FilterError, FilterResult};
use std::path::Path;

/// File extensions the batch driver treats as images (compared
/// case-insensitively).
pub const RECOGNIZED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Check whether a path carries one of the recognized image extensions.
pub fn has_recognized_extension(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    RECOGNIZED_EXTENSIONS.contains(&extension.as_str())
}

/// Clamp a float sample into the valid u8 range, rounding to nearest.
pub fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Weighted blend of two u8 samples, clamped into range.
///
/// Weights are not required to sum to 1.0; the result saturates.
pub fn blend_u8(a: u8, b: u8, weight_a: f32, weight_b: f32) -> u8 {
    clamp_u8(a as f32 * weight_a + b as f32 * weight_b)
}

/// Reject zero-area images before a filter touches pixel neighborhoods.
pub fn ensure_nonempty(filter: &str, width: u32, height: u32) -> FilterResult<()> {
    if width == 0 || height == 0 {
        return Err(FilterError::invalid_dimensions(
            filter,
            width,
            height,
            "image has no pixels",
        ));
    }
    Ok(())
}

/// Reject images too small for a filter's minimum neighborhood window.
pub fn ensure_min_dimensions(
    filter: &str,
    width: u32,
    height: u32,
    min: u32,
) -> FilterResult<()> {
    ensure_nonempty(filter, width, height)?;
    if width < min || height < min {
        return Err(FilterError::invalid_dimensions(
            filter,
            width,
            height,
            format!("both dimensions must be at least {}", min),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_recognized_extensions() {
        assert!(has_recognized_extension(&PathBuf::from("photo.png")));
        assert!(has_recognized_extension(&PathBuf::from("photo.JPG")));
        assert!(has_recognized_extension(&PathBuf::from("photo.Jpeg")));
        assert!(!has_recognized_extension(&PathBuf::from("photo.gif")));
        assert!(!has_recognized_extension(&PathBuf::from("photo")));
        assert!(!has_recognized_extension(&PathBuf::from("photo.png.txt")));
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(-3.0), 0);
        assert_eq!(clamp_u8(0.4), 0);
        assert_eq!(clamp_u8(127.5), 128);
        assert_eq!(clamp_u8(255.0), 255);
        assert_eq!(clamp_u8(300.0), 255);
    }

    #[test]
    fn test_blend_saturates() {
        assert_eq!(blend_u8(200, 200, 0.7, 0.7), 255);
        assert_eq!(blend_u8(100, 50, 0.5, 0.5), 75);
    }

    #[test]
    fn test_dimension_guards() {
        assert!(ensure_nonempty("posterize", 1, 1).is_ok());
        assert!(ensure_nonempty("posterize", 0, 5).is_err());
        assert!(ensure_min_dimensions("anime", 3, 3, 3).is_ok());
        assert!(ensure_min_dimensions("anime", 2, 10, 3).is_err());
    }
}
