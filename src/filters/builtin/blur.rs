//! Blur filters: Dream soft focus

use crate::core::error::FilterResult;
use crate::core::types::{blend_u8, ensure_nonempty};
use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};
use image::{DynamicImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

/// Register blur filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(Dream::default());
}

/// Dreamy soft-focus: a heavily blurred copy blended under the original.
///
/// The default sigma of 3.5 is what a 21x21 gaussian kernel works out to,
/// which keeps the glow wide enough to read as soft focus rather than a
/// slight defocus.
#[derive(Debug, Clone)]
pub struct Dream {
    /// Gaussian blur standard deviation.
    pub sigma: f32,
    /// Weight of the original image in the blend.
    pub original_weight: f32,
    /// Weight of the blurred copy in the blend.
    pub blurred_weight: f32,
}

impl Default for Dream {
    fn default() -> Self {
        Self {
            sigma: 3.5,
            original_weight: 0.7,
            blurred_weight: 0.3,
        }
    }
}

impl Filter for Dream {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("dream", "Dream Soft Focus", Category::Blur)
            .with_description("Blend a heavily blurred copy under the original for a soft glow")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_nonempty("dream", width, height)?;

        let blurred = gaussian_blur_f32(&rgb, self.sigma);

        let output = RgbImage::from_fn(width, height, |x, y| {
            let original = rgb.get_pixel(x, y);
            let soft = blurred.get_pixel(x, y);
            image::Rgb([
                blend_u8(original[0], soft[0], self.original_weight, self.blurred_weight),
                blend_u8(original[1], soft[1], self.original_weight, self.blurred_weight),
                blend_u8(original[2], soft[2], self.original_weight, self.blurred_weight),
            ])
        });

        Ok(DynamicImage::ImageRgb8(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    #[test]
    fn test_dream_preserves_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(24, 18, |x, y| {
            Rgb([(x * 11 % 256) as u8, (y * 9 % 256) as u8, 60])
        }));
        let result = Dream::default().apply(&img).unwrap();
        assert_eq!(result.width(), 24);
        assert_eq!(result.height(), 18);
        assert!(matches!(result, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_dream_leaves_flat_image_unchanged() {
        // Blurring a constant image yields the same constant, and
        // 0.7c + 0.3c == c
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([120, 80, 40])));
        let result = Dream::default().apply(&img).unwrap().to_rgb8();
        assert!(result.pixels().all(|p| p.0 == [120, 80, 40]));
    }

    #[test]
    fn test_dream_is_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(20, 20, |x, y| {
            Rgb([(x * x % 256) as u8, (y * 3 % 256) as u8, ((x + y) % 256) as u8])
        }));
        let first = Dream::default().apply(&img).unwrap().to_rgb8();
        let second = Dream::default().apply(&img).unwrap().to_rgb8();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_rejects_empty_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(Dream::default().apply(&img).is_err());
    }
}
