//! Transform filters: Mirror

use crate::core::error::FilterResult;
use crate::core::types::ensure_nonempty;
use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};
use image::{imageops, DynamicImage, RgbImage};

/// Register transform filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(Mirror);
}

/// Concatenates the image with its horizontal flip, doubling the width.
///
/// The left half of the output is the input unchanged; the right half is
/// its mirror image, so the seam sits on the vertical center line.
#[derive(Debug, Clone)]
pub struct Mirror;

impl Filter for Mirror {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("mirror", "Mirror", Category::Transform)
            .with_description("Concatenate the image with its horizontal flip")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_nonempty("mirror", width, height)?;

        let flipped = imageops::flip_horizontal(&rgb);

        let mut canvas = RgbImage::new(width * 2, height);
        imageops::replace(&mut canvas, &rgb, 0, 0);
        imageops::replace(&mut canvas, &flipped, width as i64, 0);

        Ok(DynamicImage::ImageRgb8(canvas))
    }
}
