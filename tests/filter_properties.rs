//! Property tests for the filter catalog's numeric contracts.

use chitra::prelude::*;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use proptest::prelude::*;

/// Strategy producing small RGB images with arbitrary pixel data.
fn arb_image() -> impl Strategy<Value = DynamicImage> {
    (1u32..12, 1u32..12)
        .prop_flat_map(|(width, height)| {
            let samples = proptest::collection::vec(any::<u8>(), (width * height * 3) as usize);
            (Just(width), Just(height), samples)
        })
        .prop_map(|(width, height, samples)| {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, samples).unwrap())
        })
}

proptest! {
    #[test]
    fn posterize_samples_land_on_level_boundaries(img in arb_image(), levels in 2u8..=8) {
        let step = 256u16 / levels as u16;
        let result = Posterize::new(levels).apply(&img).unwrap().to_rgb8();

        prop_assert_eq!(result.dimensions(), img.to_rgb8().dimensions());
        for pixel in result.pixels() {
            for &channel in pixel.0.iter() {
                prop_assert_eq!(channel as u16 % step, 0);
            }
        }
    }

    #[test]
    fn posterize_clamps_out_of_range_levels(img in arb_image(), levels in any::<u8>()) {
        let clamped = Posterize::new(levels.clamp(2, 8)).apply(&img).unwrap().to_rgb8();
        let raw = Posterize::new(levels).apply(&img).unwrap().to_rgb8();
        prop_assert_eq!(raw.as_raw(), clamped.as_raw());
    }

    #[test]
    fn posterize_never_brightens(img in arb_image()) {
        let input = img.to_rgb8();
        let result = Posterize::default().apply(&img).unwrap().to_rgb8();
        for (before, after) in input.pixels().zip(result.pixels()) {
            for c in 0..3 {
                prop_assert!(after[c] <= before[c]);
            }
        }
    }

    #[test]
    fn threshold_output_is_strictly_binary(img in arb_image()) {
        let result = Threshold::default().apply(&img).unwrap().to_luma8();
        for pixel in result.pixels() {
            prop_assert!(pixel[0] == 0 || pixel[0] == 255);
        }
    }

    #[test]
    fn mirror_halves_mirror_each_other(img in arb_image()) {
        let input = img.to_rgb8();
        let (width, height) = input.dimensions();
        let result = Mirror.apply(&img).unwrap().to_rgb8();

        prop_assert_eq!(result.dimensions(), (width * 2, height));
        for y in 0..height {
            for x in 0..width {
                prop_assert_eq!(result.get_pixel(x, y), input.get_pixel(x, y));
                prop_assert_eq!(result.get_pixel(width + x, y), input.get_pixel(width - 1 - x, y));
            }
        }
    }

    #[test]
    fn sepia_is_deterministic(img in arb_image()) {
        let first = Sepia.apply(&img).unwrap().to_rgb8();
        let second = Sepia.apply(&img).unwrap().to_rgb8();
        prop_assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn vintage_same_seed_same_output(img in arb_image(), seed in any::<u64>()) {
        let first = Vintage::with_seed(seed).apply(&img).unwrap().to_rgb8();
        let second = Vintage::with_seed(seed).apply(&img).unwrap().to_rgb8();
        prop_assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn clahe_preserves_dimensions(img in arb_image()) {
        let result = Clahe::default().apply(&img).unwrap();
        prop_assert_eq!(result.width(), img.width());
        prop_assert_eq!(result.height(), img.height());
    }
}

#[test]
fn posterize_spec_boundary() {
    // levels=4 gives step 64, so 130 floors to 128
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([130, 130, 130])));
    let result = Posterize::new(4).apply(&img).unwrap().to_rgb8();
    assert_eq!(result.get_pixel(0, 0).0, [128, 128, 128]);
}
