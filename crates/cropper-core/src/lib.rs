//! Cropper Core - image cropping library
//!
//! This crate provides the platform-independent half of the image cropper:
//! selecting a source, holding a 16:9 crop over it, and rasterizing the
//! committed crop into a PNG preview.
//!
//! # Pipeline
//!
//! 1. **Source acquisition** - a local file (inlined as a `data:` URL) or an
//!    external URL becomes the active [`ImageSource`]
//! 2. **Crop selection** - an automatic centred crop on image load, then live
//!    and committed crops from the drag overlay
//! 3. **Rasterization** - the committed crop is scaled to natural pixels and
//!    drawn onto a canvas sized for the device pixel ratio
//! 4. **Preview** - the canvas is PNG-encoded and published as an object URL
//!
//! [`Cropper`] drives the pipeline and owns the single [`CropperState`] store.

pub mod aspect;
pub mod config;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod preview;
pub mod raster;
pub mod region;
pub mod source;
pub mod state;
pub mod transform;

pub use aspect::{center_crop, constrain_crop, initial_crop, make_aspect_crop, AspectRatio};
pub use config::CropperConfig;
pub use cropper::Cropper;
pub use decode::{DecodedImage, FilterType};
pub use error::CropperError;
pub use geometry::DisplayGeometry;
pub use preview::{MemoryUrls, ObjectUrlRegistry, Preview};
pub use raster::{plan_raster, rasterize, RasterPlan, MAX_CANVAS_AREA, MAX_CANVAS_SIDE};
pub use region::{CropRegion, CropUnit, PixelRect};
pub use source::ImageSource;
pub use state::{CropperState, LoadTicket, Phase};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_types() {
        let config = CropperConfig::default();
        assert_eq!(config.aspect, AspectRatio::WIDESCREEN);
        assert_eq!(CropRegion::default().unit, CropUnit::Percent);
        assert_eq!(CropperState::new().phase(), Phase::NoImage);
    }
}
