//! Cropper WASM - WebAssembly bindings for the image cropper
//!
//! This crate exposes cropper-core to a browser page and supplies the browser
//! built-ins the core needs: object URLs, canvas pixel read-back, the device
//! pixel ratio and a console logger.
//!
//! # Module Structure
//!
//! - `cropper` - The stateful `ImageCropper` class
//! - `geometry` - Stateless crop math (`initial_crop`, `natural_source_rect`)
//! - `encode` - PNG encoding bindings
//! - `browser` - Object URLs, canvas capture, device pixel ratio
//! - `logger` - `log` backend writing to the browser console
//! - `types` - WASM-compatible wrapper types and JS conversions
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageCropper } from '@image-cropper/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new ImageCropper();
//! img.src = cropper.load_from_url('https://example.com/photo.jpg');
//! ```

use wasm_bindgen::prelude::*;

mod browser;
mod cropper;
mod encode;
mod geometry;
mod logger;
mod types;

// Re-export public types
pub use browser::{capture_image, BrowserObjectUrls};
pub use cropper::ImageCropper;
pub use encode::{encode_png, encode_png_from_image};
pub use geometry::{initial_crop, natural_source_rect};
pub use logger::set_log_level;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(logger::default_level());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
