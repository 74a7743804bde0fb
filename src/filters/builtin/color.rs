//! Color filters: Posterize, Sepia, Vintage

use crate::core::error::FilterResult;
use crate::core::types::{clamp_u8, ensure_nonempty};
use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(Posterize::default());
    registry.register(Sepia);
    registry.register(Vintage::default());
}

/// Quantizes each channel to a small number of evenly spaced levels.
#[derive(Debug, Clone)]
pub struct Posterize {
    /// Number of levels per channel; clamped to [2, 8] before use.
    pub levels: u8,
}

impl Posterize {
    /// Create a posterize filter with the given level count.
    pub fn new(levels: u8) -> Self {
        Self { levels }
    }
}

impl Default for Posterize {
    fn default() -> Self {
        Self { levels: 4 }
    }
}

impl Filter for Posterize {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("posterize", "Posterize", Category::Color)
            .with_description("Reduce each channel to a few evenly spaced levels")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let mut rgb = image.to_rgb8();
        ensure_nonempty("posterize", rgb.width(), rgb.height())?;

        let levels = self.levels.clamp(2, 8) as u16;
        let step = 256 / levels;

        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = (*channel as u16 / step * step) as u8;
            }
        }

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

/// Sepia color-mixing matrix. Rows produce (r', g', b') from an (r, g, b)
/// input triple; results are clamped to [0, 255].
const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Applies a warm, vintage-photograph color grade via a fixed mixing matrix.
#[derive(Debug, Clone)]
pub struct Sepia;

impl Filter for Sepia {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("sepia", "Sepia Tone", Category::Color)
            .with_description("Apply a fixed warm color-mixing matrix")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let mut rgb = image.to_rgb8();
        ensure_nonempty("sepia", rgb.width(), rgb.height())?;

        for pixel in rgb.pixels_mut() {
            let [r, g, b] = pixel.0.map(|c| c as f32);
            for (channel, row) in pixel.0.iter_mut().zip(SEPIA_MATRIX.iter()) {
                *channel = clamp_u8(row[0] * r + row[1] * g + row[2] * b);
            }
        }

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

/// Per-channel gains for the vintage warm tint, RGB order.
const WARM_GAINS: [f32; 3] = [1.08, 0.97, 0.78];

/// Warm tint, seeded film grain, and a radial vignette.
///
/// The grain is driven by a seeded RNG so output is byte-identical for the
/// same seed; one offset is drawn per pixel and applied to all channels.
#[derive(Debug, Clone)]
pub struct Vintage {
    /// Seed for the grain RNG.
    pub seed: u64,
    /// Maximum absolute grain offset added to each pixel.
    pub noise_amplitude: u8,
    /// Vignette gaussian spread as a fraction of each half-dimension.
    pub vignette_spread: f32,
}

impl Vintage {
    /// Create a vintage filter with an explicit grain seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

impl Default for Vintage {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            noise_amplitude: 12,
            vignette_spread: 0.75,
        }
    }
}

impl Filter for Vintage {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("vintage", "Vintage", Category::Color)
            .with_description("Warm tint with seeded film grain and a radial vignette")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_nonempty("vintage", width, height)?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let amplitude = self.noise_amplitude as i32;

        let center_x = (width as f32 - 1.0) / 2.0;
        let center_y = (height as f32 - 1.0) / 2.0;
        let sigma_x = (self.vignette_spread * width as f32 / 2.0).max(0.5);
        let sigma_y = (self.vignette_spread * height as f32 / 2.0).max(0.5);

        let mut output = rgb.clone();
        // enumerate_pixels_mut visits pixels in row-major order, so the
        // grain sequence is stable for a given seed
        for (x, y, pixel) in output.enumerate_pixels_mut() {
            let grain = rng.gen_range(-amplitude..=amplitude) as f32;

            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            let falloff = (-(dx * dx) / (2.0 * sigma_x * sigma_x)
                - (dy * dy) / (2.0 * sigma_y * sigma_y))
                .exp();

            for (channel, gain) in pixel.0.iter_mut().zip(WARM_GAINS.iter()) {
                *channel = clamp_u8((*channel as f32 * gain + grain) * falloff);
            }
        }

        Ok(DynamicImage::ImageRgb8(output))
    }
}
