//! Pixel transforms applied during rasterization.
//!
//! # Coordinate System
//!
//! - Rectangles are in natural image pixels
//! - Origin is the top-left corner

mod crop;

pub use crop::extract_region;
