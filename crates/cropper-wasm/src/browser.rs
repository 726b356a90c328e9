//! Browser built-ins the cropper depends on.
//!
//! - [`BrowserObjectUrls`] publishes previews as `blob:` object URLs.
//! - [`capture_pixels`] reads back the natural-resolution pixels of a
//!   rendered `<img>` through an off-screen canvas.
//!   [`capture_image`] exposes the same read-back to JavaScript.
//! - [`device_pixel_ratio`] reads `window.devicePixelRatio`.

use crate::types::{to_js_error, JsDecodedImage};
use cropper_core::{CropperError, DecodedImage, ObjectUrlRegistry};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
};

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// `URL.createObjectURL` over PNG blobs.
#[derive(Debug, Default)]
pub struct BrowserObjectUrls;

impl ObjectUrlRegistry for BrowserObjectUrls {
    fn create(&mut self, bytes: &[u8], mime: &str) -> Result<String, CropperError> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| CropperError::ObjectUrl(describe(&e)))?;
        Url::create_object_url_with_blob(&blob)
            .map_err(|e| CropperError::ObjectUrl(describe(&e)))
    }

    fn revoke(&mut self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            warn!("Failed to revoke {}: {}", url, describe(&e));
        }
    }
}

/// Device pixel ratio of the current window, 1.0 outside a window context.
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

/// Draw `image` at natural size onto an off-screen canvas and read it back.
///
/// # Errors
///
/// - `CrossOrigin` when the image taints the canvas (served without CORS
///   headers), which makes `getImageData` throw a `SecurityError`
/// - `InvalidGeometry` when the image has not loaded or no canvas is available
pub fn capture_pixels(image: &HtmlImageElement) -> Result<DecodedImage, CropperError> {
    let (width, height) = (image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        return Err(CropperError::InvalidGeometry(
            "image has not finished loading".to_string(),
        ));
    }

    let context = offscreen_context(width, height)?;
    context
        .draw_image_with_html_image_element(image, 0.0, 0.0)
        .map_err(|e| CropperError::InvalidGeometry(describe(&e)))?;

    let data = context
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| CropperError::CrossOrigin(describe(&e)))?;

    debug!("Captured {}x{} pixels from image element", width, height);
    Ok(DecodedImage::new(width, height, data.data().0))
}

/// Read the natural-resolution RGBA pixels of a loaded `<img>`.
///
/// Throws for a cross-origin image served without CORS headers.
#[wasm_bindgen]
pub fn capture_image(image: &HtmlImageElement) -> Result<JsDecodedImage, JsValue> {
    capture_pixels(image)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

fn offscreen_context(width: u32, height: u32) -> Result<CanvasRenderingContext2d, CropperError> {
    let canvas_error = |what: &str| CropperError::InvalidGeometry(format!("canvas: {}", what));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| canvas_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| canvas_error(&describe(&e)))?
        .dyn_into()
        .map_err(|_| canvas_error("not a canvas element"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    canvas
        .get_context("2d")
        .map_err(|e| canvas_error(&describe(&e)))?
        .ok_or_else(|| canvas_error("2d context unavailable"))?
        .dyn_into()
        .map_err(|_| canvas_error("unexpected context type"))
}
