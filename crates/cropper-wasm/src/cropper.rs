//! The `ImageCropper` class.
//!
//! Wraps the core [`Cropper`] for a browser page. The page owns the DOM: it
//! renders the `<img>` from `source_url`, runs the crop overlay, and forwards
//! the overlay's events here. This class owns all state.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new ImageCropper();
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   const ticket = cropper.begin_load();
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   img.src = cropper.load_from_file(ticket, file.type, bytes) ?? img.src;
//! };
//! img.onload = () => overlay.setCrop(cropper.on_image_load(img));
//! overlay.onChange = (c) => overlay.setCrop(cropper.on_crop_change(c));
//! overlay.onComplete = (c) => cropper.on_crop_complete(c);
//! button.onclick = () => { preview.src = cropper.generate(img) ?? preview.src; };
//! ```

use crate::browser::{capture_pixels, device_pixel_ratio, BrowserObjectUrls};
use crate::types::{from_js, to_js, to_js_error};
use cropper_core::{CropRegion, Cropper, CropperConfig, CropperError, LoadTicket};
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

#[wasm_bindgen]
pub struct ImageCropper {
    inner: Cropper<BrowserObjectUrls>,
}

#[wasm_bindgen]
impl ImageCropper {
    /// Create a cropper.
    ///
    /// # Arguments
    ///
    /// * `config` - Optional object; missing fields take their defaults
    ///   (`{ lock_aspect: true, initial_width_percent: 90, ... }`)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImageCropper, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            from_js(config)?
        };
        Self::with_config(config).map_err(to_js_error)
    }

    /// Reserve a ticket before reading a file. Pass it to `load_from_file`.
    pub fn begin_load(&mut self) -> u64 {
        self.inner.begin_load().id()
    }

    /// Finish a file read.
    ///
    /// # Returns
    ///
    /// The `data:` URL to render, or `undefined` if a newer load superseded
    /// this one.
    pub fn load_from_file(
        &mut self,
        ticket: u64,
        mime: &str,
        bytes: &[u8],
    ) -> Result<Option<String>, JsValue> {
        self.inner
            .load_from_file(LoadTicket::from_id(ticket), mime, bytes)
            .map(|source| source.map(|s| s.as_str().to_string()))
            .map_err(to_js_error)
    }

    /// Use an external URL. Returns the URL to render, or `undefined` for a
    /// blank input.
    pub fn load_from_url(&mut self, url: &str) -> Result<Option<String>, JsValue> {
        self.inner
            .load_from_url(url)
            .map(|source| source.map(|s| s.as_str().to_string()))
            .map_err(to_js_error)
    }

    /// The `<img>` finished loading. Returns the automatic crop for the overlay.
    pub fn on_image_load(&mut self, image: &HtmlImageElement) -> Result<JsValue, JsValue> {
        let crop = self
            .inner
            .on_image_load(image.natural_width(), image.natural_height())
            .map_err(to_js_error)?;
        self.inner
            .set_displayed_size(image.width() as f64, image.height() as f64);
        to_js(&crop)
    }

    /// The overlay is being dragged. Returns the crop to display.
    pub fn on_crop_change(&mut self, crop: JsValue) -> Result<JsValue, JsValue> {
        let crop: CropRegion = from_js(crop)?;
        to_js(&self.inner.on_crop_change(crop))
    }

    /// The drag ended. Returns the committed crop.
    pub fn on_crop_complete(&mut self, crop: JsValue) -> Result<JsValue, JsValue> {
        let crop: CropRegion = from_js(crop)?;
        to_js(&self.inner.on_crop_complete(crop))
    }

    /// Rasterize the committed crop of the rendered `image`.
    ///
    /// # Returns
    ///
    /// The object URL of the new PNG preview, or `undefined` when there is no
    /// committed crop yet.
    ///
    /// # Errors
    ///
    /// Fails for a cross-origin image served without CORS headers, for an
    /// empty crop, or when the output would exceed browser canvas limits.
    pub fn generate(&mut self, image: &HtmlImageElement) -> Result<Option<String>, JsValue> {
        let (width, height) = (image.width() as f64, image.height() as f64);
        self.inner.set_displayed_size(width, height);

        if self.needs_capture() && image.complete() && image.natural_width() > 0 {
            let pixels = capture_pixels(image)
                .inspect_err(|e| warn!("{}", e))
                .map_err(to_js_error)?;
            self.inner.attach_pixels(pixels);
        }

        self.inner
            .generate(width, height, device_pixel_ratio())
            .map(|preview| preview.map(|p| p.url.clone()))
            .map_err(to_js_error)
    }

    /// One of "no-image", "image-loaded", "crop-committed", "rasterized".
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn preview_url(&self) -> Option<String> {
        self.inner.preview().map(|p| p.url.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn source_url(&self) -> Option<String> {
        self.inner.source().map(|s| s.as_str().to_string())
    }

    /// The crop the next `generate` will use, or `undefined`.
    #[wasm_bindgen(getter)]
    pub fn committed_crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.state().committed_crop())
    }

    /// Revoke the preview URL and clear all state.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}

impl ImageCropper {
    pub(crate) fn with_config(config: CropperConfig) -> Result<Self, CropperError> {
        Ok(Self {
            inner: Cropper::new(config, BrowserObjectUrls)?,
        })
    }

    /// External sources have no pixels until they are read back from the
    /// element, and only a committed crop makes that worth doing.
    fn needs_capture(&self) -> bool {
        self.inner.state().committed_crop().is_some() && !self.inner.has_pixels()
    }
}

impl Drop for ImageCropper {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_file(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn cropper() -> ImageCropper {
        ImageCropper::with_config(CropperConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let cropper = cropper();
        assert_eq!(cropper.phase(), "no-image");
        assert_eq!(cropper.preview_url(), None);
        assert_eq!(cropper.source_url(), None);
    }

    #[test]
    fn test_load_from_file_returns_data_url() {
        let mut cropper = cropper();
        let ticket = cropper.begin_load();
        let url = cropper
            .load_from_file(ticket, "image/png", &png_file(8, 8))
            .unwrap()
            .unwrap();

        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(cropper.source_url(), Some(url));
        assert!(!cropper.needs_capture());
    }

    #[test]
    fn test_stale_ticket_returns_none() {
        let mut cropper = cropper();
        let stale = cropper.begin_load();
        let _current = cropper.begin_load();
        assert_eq!(
            cropper.load_from_file(stale, "image/png", &png_file(4, 4)).unwrap(),
            None
        );
    }

    #[test]
    fn test_external_source_needs_capture_once_committed() {
        let mut cropper = cropper();
        let url = cropper.load_from_url(" https://example.com/a.jpg ").unwrap();
        assert_eq!(url.as_deref(), Some("https://example.com/a.jpg"));
        assert!(!cropper.needs_capture());

        cropper.inner.on_image_load(1600, 900).unwrap();
        assert!(cropper.needs_capture());
    }

    #[test]
    fn test_blank_url_is_noop() {
        let mut cropper = cropper();
        assert_eq!(cropper.load_from_url("").unwrap(), None);
        assert_eq!(cropper.phase(), "no-image");
    }

    #[test]
    fn test_dispose_clears_source() {
        let mut cropper = cropper();
        cropper.load_from_url("https://example.com/a.jpg").unwrap();
        cropper.dispose();
        assert_eq!(cropper.source_url(), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = CropperConfig::default();
        config.allowed_schemes.clear();
        assert!(ImageCropper::with_config(config).is_err());
    }
}
