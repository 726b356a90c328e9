//! Rasterization of the committed crop.
//!
//! Mirrors the off-screen canvas procedure:
//!
//! 1. Scale the committed crop from displayed to natural pixels.
//! 2. Size the canvas to the crop's displayed size times the device pixel
//!    ratio, so high-density screens get full-resolution output.
//! 3. Draw the natural-pixel source rectangle onto the whole canvas with
//!    high-quality smoothing. A source rectangle hanging past the image edge
//!    is clipped the way `drawImage` clips it: only the visible part is drawn,
//!    onto the matching part of the canvas, and the rest stays transparent.
//!
//! [`plan_raster`] is the pure geometric half; [`rasterize`] does the pixels.

use crate::decode::{resize, DecodedImage, FilterType, CHANNELS};
use crate::error::CropperError;
use crate::geometry::DisplayGeometry;
use crate::region::{CropRegion, PixelRect};
use crate::transform::extract_region;

/// Largest canvas side browsers accept.
pub const MAX_CANVAS_SIDE: u32 = 32_767;

/// Largest canvas area browsers accept (16384 x 16384).
pub const MAX_CANVAS_AREA: u64 = 16_384 * 16_384;

/// Everything needed to draw one crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPlan {
    /// Source rectangle in natural pixels.
    pub source: PixelRect,
    /// Output width in device pixels.
    pub canvas_width: u32,
    /// Output height in device pixels.
    pub canvas_height: u32,
    /// Ratio actually applied (after fallback).
    pub device_pixel_ratio: f64,
}

/// Replace an unusable device pixel ratio with 1.0.
pub fn effective_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    }
}

/// Canvas dimensions are integers and assignment truncates. The slack absorbs
/// rounding noise from percent/pixel conversions (972.0 arriving as 971.999...).
fn canvas_extent(value: f64) -> u32 {
    (value + 1e-6) as u32
}

/// Plan the rasterization of `crop` for the given display geometry.
///
/// # Errors
///
/// - `CropperError::EmptyCrop` when the crop (or the canvas derived from it)
///   has no area
/// - `CropperError::CanvasTooLarge` when the canvas would exceed
///   [`MAX_CANVAS_SIDE`] or [`MAX_CANVAS_AREA`]
pub fn plan_raster(
    crop: &CropRegion,
    geometry: &DisplayGeometry,
    device_pixel_ratio: f64,
) -> Result<RasterPlan, CropperError> {
    if crop.is_empty() {
        return Err(CropperError::EmptyCrop);
    }

    let ratio = effective_pixel_ratio(device_pixel_ratio);
    let displayed = geometry.displayed_crop(crop);

    let (width, height) = (displayed.width * ratio, displayed.height * ratio);
    let side = MAX_CANVAS_SIDE as f64;
    if !(width <= side && height <= side && width * height <= MAX_CANVAS_AREA as f64) {
        return Err(CropperError::CanvasTooLarge { width, height });
    }

    let canvas_width = canvas_extent(width);
    let canvas_height = canvas_extent(height);
    if canvas_width == 0 || canvas_height == 0 {
        return Err(CropperError::EmptyCrop);
    }

    Ok(RasterPlan {
        source: geometry.to_natural(crop),
        canvas_width,
        canvas_height,
        device_pixel_ratio: ratio,
    })
}

/// Draw the planned source rectangle of `image` onto a fresh canvas.
///
/// # Errors
///
/// Returns `CropperError::EmptyCrop` if the source rectangle misses the image
/// entirely.
pub fn rasterize(
    image: &DecodedImage,
    plan: &RasterPlan,
    filter: FilterType,
) -> Result<DecodedImage, CropperError> {
    let (width, height) = (image.width as f64, image.height as f64);
    if plan.source.fits_within(width, height) {
        let region = extract_region(image, &plan.source).ok_or(CropperError::EmptyCrop)?;
        return Ok(resize(&region, plan.canvas_width, plan.canvas_height, filter)?);
    }

    let visible = plan
        .source
        .intersect(width, height)
        .ok_or(CropperError::EmptyCrop)?;
    let region = extract_region(image, &visible).ok_or(CropperError::EmptyCrop)?;

    let scale_x = plan.canvas_width as f64 / plan.source.width;
    let scale_y = plan.canvas_height as f64 / plan.source.height;
    let (left, drawn_width) = dest_span(
        visible.x - plan.source.x,
        visible.width,
        scale_x,
        plan.canvas_width,
    );
    let (top, drawn_height) = dest_span(
        visible.y - plan.source.y,
        visible.height,
        scale_y,
        plan.canvas_height,
    );

    let mut canvas = DecodedImage::new(
        plan.canvas_width,
        plan.canvas_height,
        vec![0u8; plan.canvas_width as usize * plan.canvas_height as usize * CHANNELS],
    );
    // A sliver thinner than one device pixel draws nothing
    if drawn_width > 0 && drawn_height > 0 {
        let drawn = resize(&region, drawn_width, drawn_height, filter)?;
        paste(&mut canvas, &drawn, left, top);
    }
    Ok(canvas)
}

/// Map a source span (offset from the source origin, extent) onto the canvas.
/// Returns the destination start and length, clamped to `canvas`.
fn dest_span(offset: f64, extent: f64, scale: f64, canvas: u32) -> (u32, u32) {
    let start = (offset * scale).round().clamp(0.0, canvas as f64);
    let end = ((offset + extent) * scale).round().clamp(start, canvas as f64);
    (start as u32, (end - start) as u32)
}

/// Copy `drawn` into `canvas` with its top-left corner at (`left`, `top`).
fn paste(canvas: &mut DecodedImage, drawn: &DecodedImage, left: u32, top: u32) {
    let stride = canvas.width as usize * CHANNELS;
    let row_len = drawn.width as usize * CHANNELS;
    for (row, src) in drawn.pixels.chunks_exact(row_len).enumerate() {
        let start = (top as usize + row) * stride + left as usize * CHANNELS;
        canvas.pixels[start..start + row_len].copy_from_slice(src);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
