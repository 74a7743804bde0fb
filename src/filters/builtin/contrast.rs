//! Contrast filters: Clahe, Threshold

use crate::core::error::FilterResult;
use crate::core::types::{clamp_u8, ensure_nonempty};
use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{threshold, ThresholdType};

/// Register contrast filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(Clahe::default());
    registry.register(Threshold::default());
}

/// Contrast-limited adaptive histogram equalization.
///
/// The luminance image is partitioned into a tile grid; each tile's
/// histogram is equalized with per-bin counts clipped at `clip_limit`
/// times the uniform bin height (excess redistributed uniformly), and
/// every pixel blends the mappings of its four surrounding tiles
/// bilinearly so tile boundaries do not show.
#[derive(Debug, Clone)]
pub struct Clahe {
    /// Per-bin clip as a multiple of the uniform histogram height.
    pub clip_limit: f32,
    /// Tile grid as (columns, rows); clamped so every tile is non-empty.
    pub tile_grid: (u32, u32),
}

impl Default for Clahe {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid: (8, 8),
        }
    }
}

impl Filter for Clahe {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("clahe", "Adaptive Contrast", Category::Contrast)
            .with_description("Contrast-limited adaptive histogram equalization on luminance")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        ensure_nonempty("clahe", width, height)?;

        let tiles_x = self.tile_grid.0.clamp(1, width);
        let tiles_y = self.tile_grid.1.clamp(1, height);

        // One clipped-equalization lookup table per tile
        let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let (x0, x1) = tile_bounds(tx, tiles_x, width);
                let (y0, y1) = tile_bounds(ty, tiles_y, height);
                luts.push(tile_lut(&gray, self.clip_limit, x0, x1, y0, y1));
            }
        }

        let lut_at = |tx: u32, ty: u32| -> &[u8; 256] { &luts[(ty * tiles_x + tx) as usize] };

        let mut output = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = pixel[0] as usize;

            // Position in tile-center space; pixels outside the outermost
            // tile centers clamp to the edge tiles
            let fx = (x as f32 + 0.5) * tiles_x as f32 / width as f32 - 0.5;
            let fy = (y as f32 + 0.5) * tiles_y as f32 / height as f32 - 0.5;

            let tx0 = fx.floor() as i64;
            let ty0 = fy.floor() as i64;
            let wx = fx - tx0 as f32;
            let wy = fy - ty0 as f32;

            let txa = tx0.clamp(0, tiles_x as i64 - 1) as u32;
            let txb = (tx0 + 1).clamp(0, tiles_x as i64 - 1) as u32;
            let tya = ty0.clamp(0, tiles_y as i64 - 1) as u32;
            let tyb = (ty0 + 1).clamp(0, tiles_y as i64 - 1) as u32;

            let top = lut_at(txa, tya)[value] as f32 * (1.0 - wx)
                + lut_at(txb, tya)[value] as f32 * wx;
            let bottom = lut_at(txa, tyb)[value] as f32 * (1.0 - wx)
                + lut_at(txb, tyb)[value] as f32 * wx;

            output.put_pixel(x, y, Luma([clamp_u8(top * (1.0 - wy) + bottom * wy)]));
        }

        Ok(DynamicImage::ImageLuma8(output))
    }
}

/// Split `extent` into `tiles` contiguous ranges; returns the half-open
/// bounds of tile `index`. Non-empty whenever `tiles <= extent`.
fn tile_bounds(index: u32, tiles: u32, extent: u32) -> (u32, u32) {
    let start = (index as u64 * extent as u64 / tiles as u64) as u32;
    let end = ((index as u64 + 1) * extent as u64 / tiles as u64) as u32;
    (start, end)
}

/// Clipped-equalization lookup table for one tile.
fn tile_lut(gray: &GrayImage, clip_limit: f32, x0: u32, x1: u32, y0: u32, y1: u32) -> [u8; 256] {
    let mut histogram = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[gray.get_pixel(x, y)[0] as usize] += 1;
        }
    }

    let pixel_count = ((x1 - x0) * (y1 - y0)) as f32;
    let limit = ((clip_limit * pixel_count / 256.0).ceil() as u32).max(1);

    let mut excess = 0u32;
    for bin in histogram.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    // Redistribute clipped mass uniformly; the remainder goes to the
    // lowest bins so the total count is preserved exactly
    let per_bin = excess / 256;
    let mut remainder = excess % 256;
    for bin in histogram.iter_mut() {
        *bin += per_bin;
        if remainder > 0 {
            *bin += 1;
            remainder -= 1;
        }
    }

    let scale = 255.0 / pixel_count;
    let mut cumulative = 0u32;
    let mut lut = [0u8; 256];
    for (value, bin) in histogram.iter().enumerate() {
        cumulative += *bin;
        lut[value] = clamp_u8(cumulative as f32 * scale);
    }
    lut
}

/// Global binary threshold on luminance.
///
/// Pixels strictly brighter than the cut map to 255, everything else to 0,
/// so the output contains exactly the two values {0, 255}.
#[derive(Debug, Clone)]
pub struct Threshold {
    /// The luminance cut.
    pub cut: u8,
}

impl Default for Threshold {
    fn default() -> Self {
        Self { cut: 127 }
    }
}

impl Filter for Threshold {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("threshold", "Threshold", Category::Contrast)
            .with_description("Binarize luminance at a global cut")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let gray = image.to_luma8();
        ensure_nonempty("threshold", gray.width(), gray.height())?;

        let binary = threshold(&gray, self.cut, ThresholdType::Binary);
        Ok(DynamicImage::ImageLuma8(binary))
    }
}
