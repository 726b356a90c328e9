//! Pixel-region extraction.
//!
//! Extracts a rectangle given in natural pixel coordinates. The rectangle is
//! clipped to the image the way `drawImage` clips a source rectangle: only
//! the overlapping part is copied.

use crate::decode::{DecodedImage, CHANNELS};
use crate::region::PixelRect;

/// Copy the pixels under `rect` into a new image.
///
/// Edges are rounded to whole pixels and clipped to the image bounds.
/// Returns `None` when the rectangle does not overlap the image.
pub fn extract_region(image: &DecodedImage, rect: &PixelRect) -> Option<DecodedImage> {
    let (left, top, width, height) = rect.clip_to(image.width, image.height)?;

    // Fast path: the whole image
    if left == 0 && top == 0 && width == image.width && height == image.height {
        return Some(image.clone());
    }

    let src_stride = image.width as usize * CHANNELS;
    let row_len = width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * height as usize);

    // Rows are contiguous in RGBA, so copy whole row slices
    for y in top..top + height {
        let start = y as usize * src_stride + left as usize * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Some(DecodedImage::new(width, height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (4u32..=100, 4u32..=100)
    }

    fn rect_strategy() -> impl Strategy<Value = PixelRect> {
        (-50.0f64..150.0, -50.0f64..150.0, 0.0f64..200.0, 0.0f64..200.0)
            .prop_map(|(x, y, w, h)| PixelRect::new(x, y, w, h))
    }

    proptest! {
        /// Property: Output never exceeds the input image.
        #[test]
        fn prop_output_bounded_by_input(
            (width, height) in dimensions_strategy(),
            rect in rect_strategy(),
        ) {
            let img = create_test_image(width, height);
            if let Some(result) = extract_region(&img, &rect) {
                prop_assert!(result.width >= 1 && result.width <= width);
                prop_assert!(result.height >= 1 && result.height <= height);
                prop_assert_eq!(result.pixels.len(), (result.width * result.height * 4) as usize);
            }
        }

        /// Property: The first output pixel is the clipped top-left source pixel.
        #[test]
        fn prop_origin_pixel_matches_source(
            (width, height) in dimensions_strategy(),
            rect in rect_strategy(),
        ) {
            let img = create_test_image(width, height);
            if let Some(result) = extract_region(&img, &rect) {
                let (left, top, _, _) = rect.clip_to(width, height).unwrap();
                prop_assert_eq!(result.pixels[0], left as u8);
                prop_assert_eq!(result.pixels[1], top as u8);
            }
        }

        /// Property: Extraction is deterministic.
        #[test]
        fn prop_extract_is_deterministic(
            (width, height) in dimensions_strategy(),
            rect in rect_strategy(),
        ) {
            let img = create_test_image(width, height);
            prop_assert_eq!(extract_region(&img, &rect), extract_region(&img, &rect));
        }
    }
}
