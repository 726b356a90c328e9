//! Cropper configuration.
//!
//! Passed from the host page as a plain object; every field is optional and
//! falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::decode::FilterType;
use crate::error::CropperError;

/// Default upper bound on local file size (25 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Ratio the crop is held to (16:9).
    pub aspect: AspectRatio,
    /// Width of the automatic crop, in percent of the image width.
    pub initial_width_percent: f64,
    /// Hold user drags to `aspect`. When false the ratio only seeds the
    /// automatic crop.
    pub lock_aspect: bool,
    /// Commit the automatic crop so it can be generated without a drag.
    pub commit_initial_crop: bool,
    /// Resampling filter used when drawing the crop onto the output canvas.
    pub filter: FilterType,
    /// Largest local file accepted, in bytes.
    pub max_file_size: u64,
    /// URL schemes accepted for external images.
    pub allowed_schemes: Vec<String>,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            aspect: AspectRatio::WIDESCREEN,
            initial_width_percent: 90.0,
            lock_aspect: true,
            commit_initial_crop: true,
            filter: FilterType::Lanczos3,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }
}

impl CropperConfig {
    pub fn validate(&self) -> Result<(), CropperError> {
        if !self.aspect.is_valid() {
            return Err(CropperError::InvalidConfig(format!(
                "aspect {}:{} must be positive",
                self.aspect.width, self.aspect.height
            )));
        }

        if !(self.initial_width_percent > 0.0 && self.initial_width_percent <= 100.0) {
            return Err(CropperError::InvalidConfig(format!(
                "initial_width_percent {} must be in (0, 100]",
                self.initial_width_percent
            )));
        }

        if self.allowed_schemes.is_empty() {
            return Err(CropperError::InvalidConfig(
                "allowed_schemes must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
