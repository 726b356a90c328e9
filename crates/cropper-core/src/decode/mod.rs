//! Image decoding for cropper sources.
//!
//! Local files arrive as raw bytes (or as `data:` URLs built from them) and are
//! decoded here into natural-resolution RGBA pixels. External URLs are never
//! decoded in Rust; the browser layer captures their pixels from the rendered
//! image element instead.

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, get_orientation, guess_format};
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, CHANNELS};
