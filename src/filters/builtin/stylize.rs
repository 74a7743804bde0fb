//! Stylization filters: Anime, Sketch, Neon, Quantize
//!
//! These share two local helpers: an edge-preserving bilateral filter and
//! an adaptive mean threshold. Both operate on clamped windows, so they are
//! safe near borders and on small images.

use crate::core::error::FilterResult;
use crate::core::types::{clamp_u8, ensure_min_dimensions, ensure_nonempty};
use crate::filters::registry::{Category, Filter, FilterMetadata, FilterRegistry};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::dilate;

/// Register stylization filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(Anime::default());
    registry.register(Sketch::default());
    registry.register(Neon::default());
    registry.register(Quantize::default());
}

/// Cartoon look: flat color regions bounded by dark outlines.
///
/// The edge mask comes from an adaptive mean threshold over a median-blurred
/// luminance image; the color regions come from bilateral smoothing of the
/// original. Pixels the mask marks as edges render black.
#[derive(Debug, Clone)]
pub struct Anime {
    /// Median pre-blur radius (window 2r+1).
    pub median_radius: u32,
    /// Adaptive threshold window radius.
    pub edge_radius: u32,
    /// Bias subtracted from the window mean before comparison.
    pub edge_offset: f32,
    /// Bilateral smoothing window radius.
    pub bilateral_radius: u32,
    /// Bilateral color sigma.
    pub sigma_color: f32,
    /// Bilateral spatial sigma.
    pub sigma_space: f32,
}

impl Default for Anime {
    fn default() -> Self {
        Self {
            median_radius: 2,
            edge_radius: 4,
            edge_offset: 9.0,
            bilateral_radius: 4,
            sigma_color: 75.0,
            sigma_space: 4.0,
        }
    }
}

impl Filter for Anime {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("anime", "Anime", Category::Stylize)
            .with_description("Bilateral-smoothed color regions with dark adaptive-threshold outlines")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_min_dimensions("anime", width, height, 3)?;

        let gray = image.to_luma8();
        let radius = self
            .median_radius
            .min((width - 1) / 2)
            .min((height - 1) / 2);
        let blurred = median_filter(&gray, radius, radius);
        let edges = adaptive_mean_threshold(&blurred, self.edge_radius, self.edge_offset);

        let smoothed = bilateral_filter(
            &rgb,
            self.bilateral_radius,
            self.sigma_color,
            self.sigma_space,
        );

        let output = RgbImage::from_fn(width, height, |x, y| {
            if edges.get_pixel(x, y)[0] == 0 {
                Rgb([0, 0, 0])
            } else {
                *smoothed.get_pixel(x, y)
            }
        });

        Ok(DynamicImage::ImageRgb8(output))
    }
}

/// Pencil sketch via a dodge blend.
///
/// The grayscale image is divided by the blurred inverse of itself (scaled
/// by 256), which leaves flat regions white and darkens only where local
/// detail diverges from its surroundings.
#[derive(Debug, Clone)]
pub struct Sketch {
    /// Gaussian sigma for blurring the inverted image.
    pub sigma: f32,
}

impl Default for Sketch {
    fn default() -> Self {
        Self { sigma: 3.5 }
    }
}

impl Filter for Sketch {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("sketch", "Pencil Sketch", Category::Stylize)
            .with_description("Dodge-blend the grayscale image against its blurred inverse")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        ensure_nonempty("sketch", width, height)?;

        let mut inverted = gray.clone();
        image::imageops::invert(&mut inverted);
        let blurred = gaussian_blur_f32(&inverted, self.sigma);

        let output = GrayImage::from_fn(width, height, |x, y| {
            let base = gray.get_pixel(x, y)[0] as u32;
            let denominator = 255 - blurred.get_pixel(x, y)[0] as u32;
            let value = if denominator == 0 {
                255
            } else {
                (base * 256 / denominator).min(255)
            };
            Luma([value as u8])
        });

        Ok(DynamicImage::ImageLuma8(output))
    }
}

/// One colored glow layer of the neon effect.
struct GlowLayer {
    /// Glow color, RGB order.
    color: [u8; 3],
    /// Gaussian sigma applied to the edge mask for this layer.
    sigma: f32,
    /// Layer opacity at full mask strength.
    weight: f32,
}

/// Inner cyan halo and outer magenta bloom.
const GLOW_LAYERS: [GlowLayer; 2] = [
    GlowLayer {
        color: [0, 229, 255],
        sigma: 2.5,
        weight: 0.8,
    },
    GlowLayer {
        color: [255, 46, 200],
        sigma: 6.0,
        weight: 0.6,
    },
];

/// Glowing outlines: dilated Canny edges blended as colored light.
///
/// Each glow layer blurs the dilated edge mask with its own sigma and adds
/// its color into the original weighted by the blurred mask, so edges get a
/// tight bright halo plus a wider colored bloom.
#[derive(Debug, Clone)]
pub struct Neon {
    /// Canny low threshold.
    pub low_threshold: f32,
    /// Canny high threshold.
    pub high_threshold: f32,
    /// L-infinity dilation radius applied to the edge mask.
    pub dilation: u8,
}

impl Default for Neon {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 100.0,
            dilation: 1,
        }
    }
}

impl Filter for Neon {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("neon", "Neon Border", Category::Stylize)
            .with_description("Blend blurred, colored glow layers along detected edges")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_min_dimensions("neon", width, height, 3)?;

        let gray = image.to_luma8();
        let edges = canny(&gray, self.low_threshold, self.high_threshold);
        let dilated = dilate(&edges, Norm::LInf, self.dilation);

        let masks: Vec<GrayImage> = GLOW_LAYERS
            .iter()
            .map(|layer| gaussian_blur_f32(&dilated, layer.sigma))
            .collect();

        let output = RgbImage::from_fn(width, height, |x, y| {
            let base = rgb.get_pixel(x, y);
            let mut accumulated = [base[0] as f32, base[1] as f32, base[2] as f32];

            for (layer, mask) in GLOW_LAYERS.iter().zip(masks.iter()) {
                let strength = mask.get_pixel(x, y)[0] as f32 / 255.0 * layer.weight;
                for (value, glow) in accumulated.iter_mut().zip(layer.color.iter()) {
                    *value += *glow as f32 * strength;
                }
            }

            Rgb([
                clamp_u8(accumulated[0]),
                clamp_u8(accumulated[1]),
                clamp_u8(accumulated[2]),
            ])
        });

        Ok(DynamicImage::ImageRgb8(output))
    }
}

/// Flat-color stylization via k-means clustering of the palette.
///
/// The image is bilateral-smoothed, its pixels clustered into `k` colors,
/// every pixel replaced by its centroid, and Canny edges drawn as dark
/// outlines. Centroid initialization samples pixels at even strides in
/// row-major order, so the result is fully deterministic.
#[derive(Debug, Clone)]
pub struct Quantize {
    /// Number of color clusters.
    pub k: usize,
    /// Maximum clustering iterations.
    pub max_iterations: usize,
    /// Stop when no centroid moves farther than this between iterations.
    pub convergence: f32,
    /// Bilateral smoothing passes before clustering.
    pub smoothing_passes: usize,
    /// Bilateral window radius.
    pub bilateral_radius: u32,
    /// Bilateral color sigma.
    pub sigma_color: f32,
    /// Bilateral spatial sigma.
    pub sigma_space: f32,
    /// Canny low threshold for the outline mask.
    pub low_threshold: f32,
    /// Canny high threshold for the outline mask.
    pub high_threshold: f32,
}

impl Default for Quantize {
    fn default() -> Self {
        Self {
            k: 8,
            max_iterations: 10,
            convergence: 1.0,
            smoothing_passes: 2,
            bilateral_radius: 3,
            sigma_color: 50.0,
            sigma_space: 3.0,
            low_threshold: 50.0,
            high_threshold: 100.0,
        }
    }
}

impl Filter for Quantize {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::new("quantize", "Color Quantize", Category::Stylize)
            .with_description("Cluster the palette into k flat colors with dark outlines")
    }

    fn apply(&self, image: &DynamicImage) -> FilterResult<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        ensure_min_dimensions("quantize", width, height, 3)?;

        let mut smoothed = rgb;
        for _ in 0..self.smoothing_passes {
            smoothed = bilateral_filter(
                &smoothed,
                self.bilateral_radius,
                self.sigma_color,
                self.sigma_space,
            );
        }

        let pixels: Vec<[f32; 3]> = smoothed
            .pixels()
            .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
            .collect();
        let centroids = kmeans(&pixels, self.k, self.max_iterations, self.convergence);

        let mut output = RgbImage::new(width, height);
        for ((_, _, pixel), sample) in output.enumerate_pixels_mut().zip(pixels.iter()) {
            let centroid = &centroids[nearest_centroid(&centroids, sample)];
            *pixel = Rgb([
                clamp_u8(centroid[0]),
                clamp_u8(centroid[1]),
                clamp_u8(centroid[2]),
            ]);
        }

        let edges = canny(&image.to_luma8(), self.low_threshold, self.high_threshold);
        for (x, y, pixel) in output.enumerate_pixels_mut() {
            if edges.get_pixel(x, y)[0] != 0 {
                *pixel = Rgb([0, 0, 0]);
            }
        }

        Ok(DynamicImage::ImageRgb8(output))
    }
}

/// Lloyd's algorithm over RGB samples with deterministic strided
/// initialization. Empty clusters keep their previous centroid.
fn kmeans(pixels: &[[f32; 3]], k: usize, max_iterations: usize, convergence: f32) -> Vec<[f32; 3]> {
    let k = k.clamp(1, pixels.len());
    let stride = pixels.len() / k;
    let mut centroids: Vec<[f32; 3]> = (0..k).map(|i| pixels[i * stride + stride / 2]).collect();

    let mut assignments = vec![0usize; pixels.len()];
    for _ in 0..max_iterations {
        for (assignment, sample) in assignments.iter_mut().zip(pixels.iter()) {
            *assignment = nearest_centroid(&centroids, sample);
        }

        let mut sums = vec![[0.0f32; 3]; k];
        let mut counts = vec![0usize; k];
        for (assignment, sample) in assignments.iter().zip(pixels.iter()) {
            for c in 0..3 {
                sums[*assignment][c] += sample[c];
            }
            counts[*assignment] += 1;
        }

        let mut max_shift = 0.0f32;
        for cluster in 0..k {
            if counts[cluster] == 0 {
                continue;
            }
            let mut updated = [0.0f32; 3];
            let mut shift_sq = 0.0f32;
            for c in 0..3 {
                updated[c] = sums[cluster][c] / counts[cluster] as f32;
                let delta = updated[c] - centroids[cluster][c];
                shift_sq += delta * delta;
            }
            centroids[cluster] = updated;
            max_shift = max_shift.max(shift_sq.sqrt());
        }

        if max_shift < convergence {
            break;
        }
    }

    centroids
}

/// Index of the centroid closest to `sample` (squared euclidean distance).
fn nearest_centroid(centroids: &[[f32; 3]], sample: &[f32; 3]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (index, centroid) in centroids.iter().enumerate() {
        let mut distance = 0.0f32;
        for c in 0..3 {
            let delta = centroid[c] - sample[c];
            distance += delta * delta;
        }
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

/// Edge-preserving smoothing: neighbors are averaged weighted by spatial
/// distance and color similarity, so flat regions smooth out while strong
/// color boundaries stay crisp. Windows clamp at the image borders.
fn bilateral_filter(img: &RgbImage, radius: u32, sigma_color: f32, sigma_space: f32) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut output = RgbImage::new(width, height);
    let color_norm = 2.0 * sigma_color * sigma_color;
    let space_norm = 2.0 * sigma_space * sigma_space;

    for y in 0..height {
        for x in 0..width {
            let center = img.get_pixel(x, y);

            let mut sums = [0.0f32; 3];
            let mut total_weight = 0.0f32;

            let y_start = y.saturating_sub(radius);
            let y_end = (y + radius + 1).min(height);
            let x_start = x.saturating_sub(radius);
            let x_end = (x + radius + 1).min(width);

            for ny in y_start..y_end {
                for nx in x_start..x_end {
                    let neighbor = img.get_pixel(nx, ny);

                    let mut color_distance = 0.0f32;
                    for c in 0..3 {
                        let delta = neighbor[c] as f32 - center[c] as f32;
                        color_distance += delta * delta;
                    }

                    let dx = nx as f32 - x as f32;
                    let dy = ny as f32 - y as f32;
                    let spatial_distance = dx * dx + dy * dy;

                    let weight =
                        (-color_distance / color_norm - spatial_distance / space_norm).exp();
                    for c in 0..3 {
                        sums[c] += neighbor[c] as f32 * weight;
                    }
                    total_weight += weight;
                }
            }

            // The center pixel contributes weight 1.0, so the sum is never 0
            output.put_pixel(
                x,
                y,
                Rgb([
                    clamp_u8(sums[0] / total_weight),
                    clamp_u8(sums[1] / total_weight),
                    clamp_u8(sums[2] / total_weight),
                ]),
            );
        }
    }

    output
}

/// Binary mask comparing each sample against the mean of its surrounding
/// window: samples brighter than `mean - offset` map to 255, the rest to 0.
/// Uses a summed-area table so the window size does not affect cost.
fn adaptive_mean_threshold(gray: &GrayImage, radius: u32, offset: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let stride = width as usize + 1;

    // integral[(y + 1) * stride + x + 1] holds the sum over [0, x] x [0, y]
    let mut integral = vec![0u64; stride * (height as usize + 1)];
    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += gray.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        let y0 = y.saturating_sub(radius) as usize;
        let y1 = (y + radius + 1).min(height) as usize;
        for x in 0..width {
            let x0 = x.saturating_sub(radius) as usize;
            let x1 = (x + radius + 1).min(width) as usize;

            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f32;
            let mean = sum as f32 / count;

            let value = if gray.get_pixel(x, y)[0] as f32 > mean - offset {
                255
            } else {
                0
            };
            output.put_pixel(x, y, Luma([value]));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 23 % 256) as u8, (y * 11 % 256) as u8, ((x * 3 + y * 7) % 256) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// A flat image with a sharp dark square in the middle, so edge
    /// detectors have something to find.
    fn square_image(size: u32) -> DynamicImage {
        let img = RgbImage::from_fn(size, size, |x, y| {
            let inside = x > size / 4 && x < 3 * size / 4 && y > size / 4 && y < 3 * size / 4;
            if inside {
                Rgb([30, 30, 30])
            } else {
                Rgb([220, 220, 220])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_anime_preserves_shape() {
        let result = Anime::default().apply(&square_image(32)).unwrap();
        assert_eq!(result.width(), 32);
        assert_eq!(result.height(), 32);
        assert!(matches!(result, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_anime_rejects_tiny_images() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])));
        assert!(Anime::default().apply(&img).is_err());
    }

    #[test]
    fn test_anime_is_deterministic() {
        let img = square_image(24);
        let first = Anime::default().apply(&img).unwrap().to_rgb8();
        let second = Anime::default().apply(&img).unwrap().to_rgb8();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_sketch_flat_image_goes_white() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([128, 128, 128])));
        let result = Sketch::default().apply(&img).unwrap().to_luma8();
        assert!(result.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_sketch_outputs_grayscale_same_shape() {
        let result = Sketch::default().apply(&square_image(20)).unwrap();
        assert_eq!(result.width(), 20);
        assert_eq!(result.height(), 20);
        assert!(matches!(result, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_neon_lights_up_edges() {
        let img = square_image(32);
        let original = img.to_rgb8();
        let result = Neon::default().apply(&img).unwrap().to_rgb8();

        assert_eq!(result.dimensions(), original.dimensions());
        // Some pixel near the square boundary must have gained glow
        let changed = result
            .pixels()
            .zip(original.pixels())
            .any(|(after, before)| after != before);
        assert!(changed, "expected glow along the square's edges");
    }

    #[test]
    fn test_neon_rejects_tiny_images() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([0, 0, 0])));
        assert!(Neon::default().apply(&img).is_err());
    }

    #[test]
    fn test_quantize_limits_palette() {
        let img = gradient_image(24, 24);
        let result = Quantize::default().apply(&img).unwrap().to_rgb8();

        let mut colors: Vec<[u8; 3]> = result.pixels().map(|p| p.0).collect();
        colors.sort_unstable();
        colors.dedup();
        // k centroids plus the black outline color
        assert!(colors.len() <= 9, "got {} distinct colors", colors.len());
    }

    #[test]
    fn test_quantize_is_deterministic() {
        let img = gradient_image(20, 20);
        let first = Quantize::default().apply(&img).unwrap().to_rgb8();
        let second = Quantize::default().apply(&img).unwrap().to_rgb8();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_kmeans_finds_separated_clusters() {
        let mut pixels = Vec::new();
        for _ in 0..50 {
            pixels.push([10.0, 10.0, 10.0]);
        }
        for _ in 0..50 {
            pixels.push([240.0, 240.0, 240.0]);
        }
        let centroids = kmeans(&pixels, 2, 10, 0.5);
        let mut brightness: Vec<f32> = centroids.iter().map(|c| c[0]).collect();
        brightness.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((brightness[0] - 10.0).abs() < 1.0);
        assert!((brightness[1] - 240.0).abs() < 1.0);
    }

    #[test]
    fn test_bilateral_keeps_flat_regions_flat() {
        let img = RgbImage::from_pixel(12, 12, Rgb([77, 144, 201]));
        let result = bilateral_filter(&img, 3, 50.0, 3.0);
        assert!(result.pixels().all(|p| p.0 == [77, 144, 201]));
    }

    #[test]
    fn test_bilateral_smooths_speckle() {
        // One bright speckle in a flat field gets pulled toward its
        // neighborhood, while the field itself stays put
        let mut img = RgbImage::from_pixel(9, 9, Rgb([100, 100, 100]));
        img.put_pixel(4, 4, Rgb([140, 140, 140]));
        let result = bilateral_filter(&img, 2, 60.0, 2.0);
        assert!(result.get_pixel(4, 4)[0] < 140);
        assert_eq!(result.get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_adaptive_mean_threshold_is_binary() {
        let gray = image::GrayImage::from_fn(16, 16, |x, y| Luma([((x * y * 5) % 256) as u8]));
        let mask = adaptive_mean_threshold(&gray, 4, 9.0);
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_adaptive_mean_threshold_flat_field_is_white() {
        // Every sample equals its window mean, and the offset biases the
        // comparison toward white
        let gray = image::GrayImage::from_pixel(10, 10, Luma([90]));
        let mask = adaptive_mean_threshold(&gray, 3, 9.0);
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_adaptive_mean_threshold_marks_dark_detail() {
        // A dark stroke on a bright field falls below its window mean
        let gray = image::GrayImage::from_fn(15, 15, |x, _| {
            Luma([if x == 7 { 20 } else { 220 }])
        });
        let mask = adaptive_mean_threshold(&gray, 3, 9.0);
        assert_eq!(mask.get_pixel(7, 7)[0], 0);
        assert_eq!(mask.get_pixel(0, 7)[0], 255);
    }
}
