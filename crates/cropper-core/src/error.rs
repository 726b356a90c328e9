//! Store-level error type.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Failures surfaced by [`crate::Cropper`] operations.
///
/// Missing preconditions (no committed crop, no pixels yet) are not errors;
/// those operations are no-ops and return `Ok(None)`.
#[derive(Debug, Error)]
pub enum CropperError {
    #[error("Unsupported file type: {0} (expected image/*)")]
    UnsupportedFileType(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unreadable image file: {0}")]
    UnreadableFile(#[from] DecodeError),

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    /// The image was served without CORS headers and its pixels cannot be read.
    #[error("Cross-origin image cannot be exported: {0}")]
    CrossOrigin(String),

    #[error("Invalid image geometry: {0}")]
    InvalidGeometry(String),

    #[error("Crop region is empty")]
    EmptyCrop,

    /// The output canvas would exceed the browser canvas limits.
    #[error("Canvas too large: {width:.0}x{height:.0} device pixels")]
    CanvasTooLarge { width: f64, height: f64 },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Object URL creation failed: {0}")]
    ObjectUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
