//! Image encoding WASM bindings.
//!
//! Exposes the core PNG encoder so a page can export pixels it already holds
//! (for example a crop it drew itself) in the same format as the preview.
//!
//! # Functions
//!
//! - [`encode_png`] - Encode RGBA pixel data to PNG bytes
//! - [`encode_png_from_image`] - Encode a JsDecodedImage to PNG bytes
//!
//! # Example
//!
//! ```typescript
//! import { encode_png } from '@image-cropper/wasm';
//!
//! const imageData = ctx.getImageData(0, 0, w, h);
//! const png = encode_png(new Uint8Array(imageData.data.buffer), w, h);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use cropper_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data as a `Uint8Array` (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
/// - Encoding fails internally
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsDecodedImage to PNG bytes.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsDecodedImage) -> Result<Vec<u8>, JsValue> {
    let decoded = image.to_decoded().map_err(to_js_error)?;
    encode::encode_png(&decoded.pixels, decoded.width, decoded.height)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
