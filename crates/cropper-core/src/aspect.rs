//! Aspect-ratio constrained crop construction.
//!
//! These helpers reproduce the crop-overlay semantics the UI relies on:
//!
//! - [`make_aspect_crop`] derives the missing side of a crop from the fixed
//!   aspect ratio, then shrinks the rectangle until it fits the media.
//! - [`center_crop`] centres a crop inside the media.
//! - [`initial_crop`] combines both into the automatic crop applied when an
//!   image finishes loading.
//!
//! All computations happen in pixels of the supplied media size. Percent input
//! yields percent output, so a crop computed against natural dimensions is
//! equally valid on the displayed image (both share one aspect ratio).

use serde::{Deserialize, Serialize};

use crate::region::{CropRegion, CropUnit};

/// Fixed width:height ratio of the crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    /// Widescreen 16:9.
    pub const WIDESCREEN: AspectRatio = AspectRatio {
        width: 16.0,
        height: 9.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn value(&self) -> f64 {
        self.width / self.height
    }

    /// True when both sides are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// Fit `crop` to `aspect` inside a `media_width` x `media_height` container.
///
/// When the crop has a width, its height is derived from it; otherwise the
/// width is derived from the height. If the result overflows the bottom edge
/// the height is cut back to fit and the width rederived, then the same is
/// done against the right edge. The crop keeps its unit.
pub fn make_aspect_crop(
    crop: CropRegion,
    aspect: f64,
    media_width: f64,
    media_height: f64,
) -> CropRegion {
    let mut px = crop.to_pixels(media_width, media_height);

    if px.width > 0.0 {
        px.height = px.width / aspect;
    } else if px.height > 0.0 {
        px.width = px.height * aspect;
    }

    if px.y + px.height > media_height {
        px.height = media_height - px.y;
        px.width = px.height * aspect;
    }

    if px.x + px.width > media_width {
        px.width = media_width - px.x;
        px.height = px.width / aspect;
    }

    px.to_unit(crop.unit, media_width, media_height)
}

/// Centre `crop` inside a `media_width` x `media_height` container.
pub fn center_crop(crop: CropRegion, media_width: f64, media_height: f64) -> CropRegion {
    let mut px = crop.to_pixels(media_width, media_height);
    px.x = (media_width - px.width) / 2.0;
    px.y = (media_height - px.height) / 2.0;
    px.to_unit(crop.unit, media_width, media_height)
}

/// The crop applied automatically when an image loads.
///
/// `width_percent` of the media width at `aspect`, centred, in percent units.
pub fn initial_crop(
    aspect: AspectRatio,
    width_percent: f64,
    natural_width: f64,
    natural_height: f64,
) -> CropRegion {
    let seed = CropRegion {
        unit: CropUnit::Percent,
        width: width_percent,
        ..CropRegion::default()
    };

    center_crop(
        make_aspect_crop(seed, aspect.value(), natural_width, natural_height),
        natural_width,
        natural_height,
    )
}

/// Hold a user-drawn crop to `aspect` while keeping it inside the media.
///
/// The top-left corner stays anchored where possible. Corners dragged past the
/// media edges are pulled back first.
pub fn constrain_crop(
    crop: CropRegion,
    aspect: f64,
    media_width: f64,
    media_height: f64,
) -> CropRegion {
    let mut px = crop.to_pixels(media_width, media_height);
    px.x = px.x.clamp(0.0, media_width);
    px.y = px.y.clamp(0.0, media_height);
    px.width = px.width.max(0.0);
    px.height = px.height.max(0.0);

    make_aspect_crop(
        px.to_unit(crop.unit, media_width, media_height),
        aspect,
        media_width,
        media_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_aspect_ratio_default_is_16_9() {
        let aspect = AspectRatio::default();
        assert!((aspect.value() - 16.0 / 9.0).abs() < EPS);
        assert!(aspect.is_valid());
        assert!(!AspectRatio::new(0.0, 9.0).is_valid());
        assert!(!AspectRatio::new(16.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_initial_crop_1920x1080() {
        // 16:9 media: the crop is 90% wide and 90% tall, centred
        let crop = initial_crop(AspectRatio::WIDESCREEN, 90.0, 1920.0, 1080.0);
        assert_eq!(crop.unit, CropUnit::Percent);
        assert!(close(crop.width, 90.0));
        assert!(close(crop.height, 90.0));
        assert!(close(crop.x, 5.0));
        assert!(close(crop.y, 5.0));
    }

    #[test]
    fn test_initial_crop_square_media() {
        let crop = initial_crop(AspectRatio::WIDESCREEN, 90.0, 1000.0, 1000.0);
        let px = crop.to_pixels(1000.0, 1000.0);
        assert!(close(px.width, 900.0));
        assert!(close(px.height, 506.25));
        assert!(close(px.x, 50.0));
        assert!(close(px.y, (1000.0 - 506.25) / 2.0));
    }

    #[test]
    fn test_initial_crop_panorama_is_height_limited() {
        // 3:1 media: 90% width would need more height than exists
        let crop = initial_crop(AspectRatio::WIDESCREEN, 90.0, 3000.0, 1000.0);
        let px = crop.to_pixels(3000.0, 1000.0);
        assert!(close(px.height, 1000.0));
        assert!(close(px.width, 1000.0 * 16.0 / 9.0));
        assert!(close(px.y, 0.0));
        assert!(px.width < 2700.0);
    }

    #[test]
    fn test_make_aspect_crop_from_height() {
        let seed = CropRegion::pixels(0.0, 0.0, 0.0, 90.0);
        let crop = make_aspect_crop(seed, 16.0 / 9.0, 400.0, 400.0);
        assert!(close(crop.width, 160.0));
        assert!(close(crop.height, 90.0));
    }

    #[test]
    fn test_make_aspect_crop_shrinks_against_right_edge() {
        let crop = make_aspect_crop(
            CropRegion::pixels(300.0, 0.0, 200.0, 0.0),
            16.0 / 9.0,
            400.0,
            400.0,
        );
        assert!(close(crop.width, 100.0));
        assert!(close(crop.height, 56.25));
    }

    #[test]
    fn test_center_crop_keeps_size() {
        let crop = center_crop(CropRegion::pixels(0.0, 0.0, 160.0, 90.0), 200.0, 100.0);
        assert_eq!(crop, CropRegion::pixels(20.0, 5.0, 160.0, 90.0));
    }

    #[test]
    fn test_constrain_free_drag_restores_ratio() {
        let dragged = CropRegion::pixels(10.0, 10.0, 320.0, 50.0);
        let crop = constrain_crop(dragged, 16.0 / 9.0, 800.0, 600.0);
        assert!(close(crop.x, 10.0));
        assert!(close(crop.width, 320.0));
        assert!(close(crop.height, 180.0));
    }

    #[test]
    fn test_constrain_pulls_back_negative_origin() {
        let dragged = CropRegion::percent(-10.0, -5.0, 50.0, 10.0);
        let crop = constrain_crop(dragged, 16.0 / 9.0, 1600.0, 900.0);
        assert_eq!(crop.unit, CropUnit::Percent);
        assert!(close(crop.x, 0.0));
        assert!(close(crop.y, 0.0));
        // 16:9 media: a 16:9 crop has equal percent width and height
        assert!(close(crop.width, 50.0));
        assert!(close(crop.height, 50.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-6;

    fn media_strategy() -> impl Strategy<Value = (f64, f64)> {
        (1u32..=8000, 1u32..=8000).prop_map(|(w, h)| (w as f64, h as f64))
    }

    proptest! {
        /// Property: The initial crop is exactly 16:9 in pixels.
        #[test]
        fn prop_initial_crop_is_16_9((w, h) in media_strategy()) {
            let px = initial_crop(AspectRatio::WIDESCREEN, 90.0, w, h).to_pixels(w, h);
            let ratio = px.width / px.height;
            prop_assert!((ratio - 16.0 / 9.0).abs() < TOLERANCE, "ratio {}", ratio);
        }

        /// Property: The initial crop is at most 90% of the width.
        #[test]
        fn prop_initial_crop_width_bounded((w, h) in media_strategy()) {
            let crop = initial_crop(AspectRatio::WIDESCREEN, 90.0, w, h);
            prop_assert!(crop.width <= 90.0 + TOLERANCE);
            prop_assert!(crop.width > 0.0);
        }

        /// Property: The initial crop lies inside the media.
        #[test]
        fn prop_initial_crop_inside_bounds((w, h) in media_strategy()) {
            let px = initial_crop(AspectRatio::WIDESCREEN, 90.0, w, h).to_pixels(w, h);
            prop_assert!(px.x >= -TOLERANCE && px.y >= -TOLERANCE);
            prop_assert!(px.x + px.width <= w + TOLERANCE * w);
            prop_assert!(px.y + px.height <= h + TOLERANCE * h);
        }

        /// Property: The initial crop is centred.
        #[test]
        fn prop_initial_crop_centred((w, h) in media_strategy()) {
            let px = initial_crop(AspectRatio::WIDESCREEN, 90.0, w, h).to_pixels(w, h);
            prop_assert!((px.x * 2.0 + px.width - w).abs() < TOLERANCE * w.max(1.0));
            prop_assert!((px.y * 2.0 + px.height - h).abs() < TOLERANCE * h.max(1.0));
        }

        /// Property: Constrained drags keep the ratio and stay inside the media.
        #[test]
        fn prop_constrain_keeps_ratio_and_bounds(
            (w, h) in media_strategy(),
            (x, y) in (-100.0f64..100.0, -100.0f64..100.0),
            (cw, ch) in (1.0f64..120.0, 1.0f64..120.0),
        ) {
            let crop = constrain_crop(CropRegion::percent(x, y, cw, ch), 16.0 / 9.0, w, h);
            let px = crop.to_pixels(w, h);
            if px.height > TOLERANCE {
                prop_assert!((px.width / px.height - 16.0 / 9.0).abs() < 1e-4);
            }
            prop_assert!(px.x >= -TOLERANCE && px.y >= -TOLERANCE);
            prop_assert!(px.x + px.width <= w * (1.0 + TOLERANCE));
            prop_assert!(px.y + px.height <= h * (1.0 + TOLERANCE));
        }
    }
}
