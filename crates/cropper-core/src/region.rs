//! Crop rectangles.
//!
//! A [`CropRegion`] is expressed relative to the *displayed* image, either in
//! percent of the displayed size or in displayed (CSS) pixels. This is the
//! shape the crop-selection overlay reports on every drag event.
//!
//! A [`PixelRect`] is a rectangle in natural image pixels, produced only at
//! rasterization time.

use serde::{Deserialize, Serialize};

/// Unit of a [`CropRegion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropUnit {
    /// Percent of the displayed image size (0 to 100).
    #[default]
    #[serde(rename = "%")]
    Percent,
    /// Displayed (CSS) pixels.
    #[serde(rename = "px")]
    Pixel,
}

/// Rectangle selected over the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRegion {
    #[serde(default)]
    pub unit: CropUnit,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl CropRegion {
    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    /// True when the region covers no area (or carries non-finite values).
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Express this region in pixels of a `width` x `height` container.
    ///
    /// Pixel regions are returned unchanged.
    pub fn to_pixels(&self, width: f64, height: f64) -> Self {
        match self.unit {
            CropUnit::Pixel => *self,
            CropUnit::Percent => Self::pixels(
                self.x * width / 100.0,
                self.y * height / 100.0,
                self.width * width / 100.0,
                self.height * height / 100.0,
            ),
        }
    }

    /// Express this region in percent of a `width` x `height` container.
    ///
    /// Percent regions are returned unchanged.
    pub fn to_percent(&self, width: f64, height: f64) -> Self {
        match self.unit {
            CropUnit::Percent => *self,
            CropUnit::Pixel => Self::percent(
                self.x / width * 100.0,
                self.y / height * 100.0,
                self.width / width * 100.0,
                self.height / height * 100.0,
            ),
        }
    }

    /// Convert into `unit` against a `width` x `height` container.
    pub fn to_unit(&self, unit: CropUnit, width: f64, height: f64) -> Self {
        match unit {
            CropUnit::Percent => self.to_percent(width, height),
            CropUnit::Pixel => self.to_pixels(width, height),
        }
    }

    /// Width over height, or `None` for an empty region.
    pub fn aspect(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.width / self.height)
    }
}

/// Rectangle in natural image pixels. Edges may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle lies within a `width` x `height` image.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        const SLACK: f64 = 1e-6;
        self.x >= -SLACK
            && self.y >= -SLACK
            && self.x + self.width <= width + SLACK
            && self.y + self.height <= height + SLACK
    }

    /// The part of the rectangle inside a `width` x `height` image, or `None`
    /// when they do not overlap.
    pub fn intersect(&self, width: f64, height: f64) -> Option<PixelRect> {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(width);
        let bottom = (self.y + self.height).min(height);

        (right > left && bottom > top)
            .then(|| PixelRect::new(left, top, right - left, bottom - top))
    }

    /// Snap to whole pixels and clip against a `width` x `height` image.
    ///
    /// Returns `(left, top, width, height)`, or `None` when nothing of the
    /// rectangle lies inside the image.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.round().clamp(0.0, width as f64);
        let top = self.y.round().clamp(0.0, height as f64);
        let right = (self.x + self.width).round().clamp(0.0, width as f64);
        let bottom = (self.y + self.height).round().clamp(0.0, height as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_pixels() {
        let crop = CropRegion::percent(5.0, 10.0, 90.0, 50.0);
        let px = crop.to_pixels(800.0, 600.0);
        assert_eq!(px, CropRegion::pixels(40.0, 60.0, 720.0, 300.0));
    }

    #[test]
    fn test_pixels_to_percent() {
        let crop = CropRegion::pixels(40.0, 60.0, 720.0, 300.0);
        let pct = crop.to_percent(800.0, 600.0);
        assert_eq!(pct, CropRegion::percent(5.0, 10.0, 90.0, 50.0));
    }

    #[test]
    fn test_same_unit_is_identity() {
        let crop = CropRegion::pixels(1.0, 2.0, 3.0, 4.0);
        assert_eq!(crop.to_pixels(10.0, 10.0), crop);
        assert_eq!(crop.to_unit(CropUnit::Pixel, 10.0, 10.0), crop);
    }

    #[test]
    fn test_is_empty() {
        assert!(CropRegion::default().is_empty());
        assert!(CropRegion::pixels(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(CropRegion::pixels(0.0, 0.0, f64::NAN, 5.0).is_empty());
        assert!(!CropRegion::pixels(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_aspect() {
        assert_eq!(CropRegion::pixels(0.0, 0.0, 160.0, 90.0).aspect(), Some(160.0 / 90.0));
        assert_eq!(CropRegion::default().aspect(), None);
    }

    #[test]
    fn test_clip_inside() {
        let rect = PixelRect::new(10.2, 20.6, 100.0, 50.0);
        assert_eq!(rect.clip_to(1920, 1080), Some((10, 21, 100, 50)));
    }

    #[test]
    fn test_clip_overhanging_edges() {
        let rect = PixelRect::new(-5.0, 90.0, 50.0, 50.0);
        assert_eq!(rect.clip_to(100, 100), Some((0, 90, 45, 10)));
    }

    #[test]
    fn test_clip_outside() {
        assert_eq!(PixelRect::new(200.0, 0.0, 10.0, 10.0).clip_to(100, 100), None);
        assert_eq!(PixelRect::new(0.0, 0.0, 0.2, 0.2).clip_to(100, 100), None);
    }

    #[test]
    fn test_fits_within() {
        assert!(PixelRect::new(0.0, 0.0, 100.0, 50.0).fits_within(100.0, 50.0));
        assert!(!PixelRect::new(50.0, 0.0, 100.0, 50.0).fits_within(100.0, 50.0));
        assert!(!PixelRect::new(-1.0, 0.0, 10.0, 10.0).fits_within(100.0, 50.0));
    }

    #[test]
    fn test_intersect_overhang() {
        let rect = PixelRect::new(50.0, -10.0, 100.0, 40.0);
        assert_eq!(
            rect.intersect(100.0, 50.0),
            Some(PixelRect::new(50.0, 0.0, 50.0, 30.0))
        );
        assert_eq!(PixelRect::new(120.0, 0.0, 10.0, 10.0).intersect(100.0, 50.0), None);
    }
}
