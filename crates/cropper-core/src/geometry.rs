//! Natural versus displayed image geometry.
//!
//! The crop overlay reports rectangles in displayed (CSS) pixels, while the
//! source pixels live at the image's natural resolution. The ratio between
//! the two is read from the live image element whenever a crop is rasterized,
//! so it reflects the current layout rather than the layout at load time.

use crate::error::CropperError;
use crate::region::{CropRegion, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub natural_width: f64,
    pub natural_height: f64,
    pub displayed_width: f64,
    pub displayed_height: f64,
}

impl DisplayGeometry {
    /// Build a geometry, rejecting zero, negative or non-finite sizes.
    pub fn new(
        natural_width: f64,
        natural_height: f64,
        displayed_width: f64,
        displayed_height: f64,
    ) -> Result<Self, CropperError> {
        let all_positive = [natural_width, natural_height, displayed_width, displayed_height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);

        if !all_positive {
            return Err(CropperError::InvalidGeometry(format!(
                "natural {}x{}, displayed {}x{}",
                natural_width, natural_height, displayed_width, displayed_height
            )));
        }

        Ok(Self {
            natural_width,
            natural_height,
            displayed_width,
            displayed_height,
        })
    }

    /// Horizontal natural pixels per displayed pixel.
    pub fn scale_x(&self) -> f64 {
        self.natural_width / self.displayed_width
    }

    /// Vertical natural pixels per displayed pixel.
    pub fn scale_y(&self) -> f64 {
        self.natural_height / self.displayed_height
    }

    /// The crop in displayed pixels.
    pub fn displayed_crop(&self, crop: &CropRegion) -> CropRegion {
        crop.to_pixels(self.displayed_width, self.displayed_height)
    }

    /// Map a crop on the displayed image to the natural-pixel source rectangle.
    pub fn to_natural(&self, crop: &CropRegion) -> PixelRect {
        let px = self.displayed_crop(crop);
        PixelRect::new(
            px.x * self.scale_x(),
            px.y * self.scale_y(),
            px.width * self.scale_x(),
            px.height * self.scale_y(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factors() {
        let geo = DisplayGeometry::new(1920.0, 1080.0, 960.0, 540.0).unwrap();
        assert_eq!(geo.scale_x(), 2.0);
        assert_eq!(geo.scale_y(), 2.0);
    }

    #[test]
    fn test_anisotropic_display() {
        // CSS can stretch an image; each axis scales independently
        let geo = DisplayGeometry::new(1000.0, 1000.0, 500.0, 250.0).unwrap();
        let rect = geo.to_natural(&CropRegion::pixels(10.0, 10.0, 100.0, 50.0));
        assert_eq!(rect, PixelRect::new(20.0, 40.0, 200.0, 200.0));
    }

    #[test]
    fn test_percent_crop_maps_through_display() {
        let geo = DisplayGeometry::new(1920.0, 1080.0, 640.0, 360.0).unwrap();
        let rect = geo.to_natural(&CropRegion::percent(5.0, 5.0, 90.0, 90.0));
        assert!((rect.x - 96.0).abs() < 1e-9);
        assert!((rect.y - 54.0).abs() < 1e-9);
        assert!((rect.width - 1728.0).abs() < 1e-9);
        assert!((rect.height - 972.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(DisplayGeometry::new(0.0, 10.0, 10.0, 10.0).is_err());
        assert!(DisplayGeometry::new(10.0, 10.0, -1.0, 10.0).is_err());
        assert!(DisplayGeometry::new(10.0, 10.0, 10.0, f64::NAN).is_err());
    }
}
