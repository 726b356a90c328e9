//! WASM bindings for crop geometry.
//!
//! Stateless helpers for pages that drive their own crop overlay and only
//! need the math: the automatic 16:9 crop and the displayed-to-natural
//! scaling used at rasterization.

use crate::types::{from_js, to_js, to_js_error};
use cropper_core::{initial_crop as core_initial_crop, AspectRatio, CropRegion, CropperError};
use cropper_core::{DisplayGeometry, PixelRect};
use wasm_bindgen::prelude::*;

/// Width of the automatic crop, in percent of the image width.
const INITIAL_WIDTH_PERCENT: f64 = 90.0;

/// The centred 16:9 crop applied when an image loads.
///
/// # Returns
///
/// `{ unit: "%", x, y, width, height }`
///
/// # Example (TypeScript)
///
/// ```typescript
/// img.onload = () => setCrop(initial_crop(img.naturalWidth, img.naturalHeight));
/// ```
#[wasm_bindgen]
pub fn initial_crop(natural_width: u32, natural_height: u32) -> Result<JsValue, JsValue> {
    to_js(&widescreen_crop(natural_width, natural_height))
}

/// Scale a crop over the displayed image into natural image pixels.
///
/// # Arguments
///
/// * `crop` - `{ unit, x, y, width, height }` relative to the displayed image
/// * `natural_width`, `natural_height` - intrinsic image size
/// * `displayed_width`, `displayed_height` - rendered element size
///
/// # Returns
///
/// `{ x, y, width, height }` in natural pixels.
#[wasm_bindgen]
pub fn natural_source_rect(
    crop: JsValue,
    natural_width: f64,
    natural_height: f64,
    displayed_width: f64,
    displayed_height: f64,
) -> Result<JsValue, JsValue> {
    let crop: CropRegion = from_js(crop)?;
    let rect = source_rect(
        &crop,
        natural_width,
        natural_height,
        displayed_width,
        displayed_height,
    )
    .map_err(to_js_error)?;
    to_js(&rect)
}

fn widescreen_crop(natural_width: u32, natural_height: u32) -> CropRegion {
    core_initial_crop(
        AspectRatio::WIDESCREEN,
        INITIAL_WIDTH_PERCENT,
        natural_width as f64,
        natural_height as f64,
    )
}

fn source_rect(
    crop: &CropRegion,
    natural_width: f64,
    natural_height: f64,
    displayed_width: f64,
    displayed_height: f64,
) -> Result<PixelRect, CropperError> {
    let geometry = DisplayGeometry::new(
        natural_width,
        natural_height,
        displayed_width,
        displayed_height,
    )?;
    Ok(geometry.to_natural(crop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropper_core::CropUnit;

    #[test]
    fn test_widescreen_crop_on_widescreen_image() {
        let crop = widescreen_crop(1920, 1080);
        assert_eq!(crop.unit, CropUnit::Percent);
        assert!((crop.x - 5.0).abs() < 1e-9);
        assert!((crop.y - 5.0).abs() < 1e-9);
        assert!((crop.width - 90.0).abs() < 1e-9);
        assert!((crop.height - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_widescreen_crop_on_portrait_image() {
        let crop = widescreen_crop(1080, 1920);
        // 90% of the width, height follows the 16:9 ratio
        let w_px = crop.width / 100.0 * 1080.0;
        let h_px = crop.height / 100.0 * 1920.0;
        assert!((w_px / h_px - 16.0 / 9.0).abs() < 1e-6);
        assert!((crop.y + crop.height / 2.0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_rect_scales() {
        let crop = CropRegion::pixels(10.0, 20.0, 160.0, 90.0);
        let rect = source_rect(&crop, 2000.0, 1000.0, 500.0, 250.0).unwrap();
        assert_eq!(rect, PixelRect::new(40.0, 80.0, 640.0, 360.0));
    }

    #[test]
    fn test_source_rect_rejects_unrendered_image() {
        let crop = CropRegion::pixels(0.0, 0.0, 16.0, 9.0);
        assert!(matches!(
            source_rect(&crop, 2000.0, 1000.0, 0.0, 0.0),
            Err(CropperError::InvalidGeometry(_))
        ));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_initial_crop_round_trips_through_js() {
        let value = initial_crop(1600, 900).unwrap();
        let crop: CropRegion = from_js(value).unwrap();
        assert!((crop.width - 90.0).abs() < 1e-9);
    }

    #[wasm_bindgen_test]
    fn test_natural_source_rect_invalid_geometry() {
        let crop = to_js(&CropRegion::pixels(0.0, 0.0, 16.0, 9.0)).unwrap();
        assert!(natural_source_rect(crop, 100.0, 100.0, 0.0, 100.0).is_err());
    }
}
