//! Export encoding for rasterized crops.
//!
//! The cropped canvas is exported as PNG, the lossless equivalent of
//! `canvas.toBlob(cb, "image/png", 1)`.
//!
//! ```ignore
//! use cropper_core::encode::encode_png;
//!
//! let pixels = vec![128u8; 16 * 9 * 4];
//! let png = encode_png(&pixels, 16, 9).unwrap();
//! assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
//! ```

mod png;

pub use png::{encode_png, EncodeError, PNG_MIME};
