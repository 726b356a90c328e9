//! The cropper component.
//!
//! [`Cropper`] wires the pipeline together: source acquisition, crop
//! selection, rasterization and preview lifecycle. It owns the
//! [`CropperState`] store, the natural-resolution pixels of the current
//! source, and the object URL registry previews are published through.
//!
//! # Example
//!
//! ```ignore
//! use cropper_core::{Cropper, CropperConfig, MemoryUrls};
//!
//! let mut cropper = Cropper::new(CropperConfig::default(), MemoryUrls::new())?;
//! let ticket = cropper.begin_load();
//! cropper.load_from_file(ticket, "image/png", &bytes)?;
//! cropper.on_image_load(1920, 1080)?;
//! let preview = cropper.generate(960.0, 540.0, 2.0)?;
//! ```

use log::{debug, info, warn};

use crate::aspect::{constrain_crop, initial_crop};
use crate::config::CropperConfig;
use crate::decode::{decode_image, DecodedImage};
use crate::encode::{encode_png, PNG_MIME};
use crate::error::CropperError;
use crate::geometry::DisplayGeometry;
use crate::preview::{ObjectUrlRegistry, Preview};
use crate::raster::{plan_raster, rasterize};
use crate::region::{CropRegion, CropUnit};
use crate::source::{encode_data_url, is_image_mime, validate_external_url, ImageSource};
use crate::state::{CropperState, LoadTicket, Phase};

/// The image cropper store.
///
/// Every event from the page goes through one method here; the methods never
/// panic on user input and report failures as [`CropperError`]. Previews are
/// published through `R`, and each one is revoked before its successor is
/// created.
pub struct Cropper<R: ObjectUrlRegistry> {
    config: CropperConfig,
    state: CropperState,
    /// Natural-resolution pixels of the current source, once known.
    pixels: Option<DecodedImage>,
    urls: R,
}

impl<R: ObjectUrlRegistry> Cropper<R> {
    /// Create a cropper publishing previews through `urls`.
    ///
    /// # Errors
    ///
    /// Returns `CropperError::InvalidConfig` if `config` fails validation.
    pub fn new(config: CropperConfig, urls: R) -> Result<Self, CropperError> {
        config.validate()?;
        Ok(Self {
            config,
            state: CropperState::new(),
            pixels: None,
            urls,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn state(&self) -> &CropperState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.state.source()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.state.preview()
    }

    pub fn urls(&self) -> &R {
        &self.urls
    }

    /// True once pixels for the current source are available.
    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    // ------------------------------------------------------------------
    // Image source acquisition
    // ------------------------------------------------------------------

    /// Reserve a ticket before starting an asynchronous file read.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.state.begin_load()
    }

    /// Complete a file read started with [`Cropper::begin_load`].
    ///
    /// Returns `Ok(None)` without changing anything when a newer load has
    /// started since `ticket` was issued.
    ///
    /// # Errors
    ///
    /// - `UnsupportedFileType` if `mime` is not `image/*`
    /// - `FileTooLarge` if `bytes` exceeds the configured limit
    /// - `UnreadableFile` if the bytes do not decode
    pub fn load_from_file(
        &mut self,
        ticket: LoadTicket,
        mime: &str,
        bytes: &[u8],
    ) -> Result<Option<&ImageSource>, CropperError> {
        if !self.state.is_current(ticket) {
            debug!("Ignoring superseded file load (ticket {})", ticket.id());
            return Ok(None);
        }

        if !is_image_mime(mime) {
            warn!("Rejected file of type '{}'", mime);
            return Err(CropperError::UnsupportedFileType(mime.to_string()));
        }

        let size = bytes.len() as u64;
        if size > self.config.max_file_size {
            warn!("Rejected {} byte file", size);
            return Err(CropperError::FileTooLarge {
                size,
                limit: self.config.max_file_size,
            });
        }

        let decoded = decode_image(bytes).inspect_err(|e| warn!("File did not decode: {}", e))?;

        let source = ImageSource::DataUrl {
            url: encode_data_url(mime, bytes),
            mime: mime.to_string(),
        };
        info!(
            "Loaded {} ({}x{})",
            source.describe(),
            decoded.width,
            decoded.height
        );

        self.install_source(source, Some(decoded));
        Ok(self.state.source())
    }

    /// Use an external URL as the source.
    ///
    /// A blank string is a no-op. The URL supersedes any file read still in
    /// flight. Whether the image exists, and whether its pixels may be read
    /// back, is only discovered by the browser.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` if the string does not parse or its scheme is not
    /// allowed.
    pub fn load_from_url(&mut self, url: &str) -> Result<Option<&ImageSource>, CropperError> {
        let url = url.trim();
        if url.is_empty() {
            debug!("Ignoring empty external URL");
            return Ok(None);
        }

        validate_external_url(url, &self.config.allowed_schemes)
            .inspect_err(|e| warn!("{}", e))?;

        let _ = self.state.begin_load();
        let source = ImageSource::External {
            url: url.to_string(),
        };
        info!("Loading {}", source.describe());

        self.install_source(source, None);
        Ok(self.state.source())
    }

    /// Provide natural-resolution pixels for an external source.
    pub fn attach_pixels(&mut self, image: DecodedImage) {
        debug!("Attached {}x{} source pixels", image.width, image.height);
        self.pixels = Some(image);
    }

    fn install_source(&mut self, source: ImageSource, pixels: Option<DecodedImage>) {
        let stale = self.state.set_source(source);
        self.release(stale);
        self.pixels = pixels;
    }

    // ------------------------------------------------------------------
    // Crop region selection
    // ------------------------------------------------------------------

    /// The image element finished loading; apply the automatic crop.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` for a zero dimension.
    pub fn on_image_load(
        &mut self,
        natural_width: u32,
        natural_height: u32,
    ) -> Result<CropRegion, CropperError> {
        if natural_width == 0 || natural_height == 0 {
            return Err(CropperError::InvalidGeometry(format!(
                "natural size {}x{}",
                natural_width, natural_height
            )));
        }

        if let Some(pixels) = &self.pixels {
            if (pixels.width, pixels.height) != (natural_width, natural_height) {
                warn!(
                    "Rendered size {}x{} differs from decoded {}x{}",
                    natural_width, natural_height, pixels.width, pixels.height
                );
            }
        }

        let crop = initial_crop(
            self.config.aspect,
            self.config.initial_width_percent,
            natural_width as f64,
            natural_height as f64,
        );
        self.state.image_loaded(
            (natural_width, natural_height),
            crop,
            self.config.commit_initial_crop,
        );

        debug!("Image loaded at {}x{}, initial crop {:?}", natural_width, natural_height, crop);
        Ok(crop)
    }

    /// Record the rendered size of the image element.
    ///
    /// A size that is zero, negative or non-finite (an element not yet laid
    /// out) is ignored and the previous size, if any, is kept.
    pub fn set_displayed_size(&mut self, width: f64, height: f64) {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) {
            debug!("Ignoring unusable displayed size {}x{}", width, height);
            return;
        }
        self.state.set_displayed_size(width, height);
    }

    /// A drag is in progress. Returns the crop as stored, after the aspect
    /// lock has been applied.
    pub fn on_crop_change(&mut self, crop: CropRegion) -> CropRegion {
        let crop = self.lock_aspect(crop);
        self.state.update_live(crop);
        crop
    }

    /// A drag finished; the crop becomes the one rasterization uses.
    pub fn on_crop_complete(&mut self, crop: CropRegion) -> CropRegion {
        let crop = self.lock_aspect(crop);
        self.state.commit(crop);
        debug!("Committed crop {:?}", crop);
        crop
    }

    fn lock_aspect(&self, crop: CropRegion) -> CropRegion {
        if !self.config.lock_aspect || crop.is_empty() {
            return crop;
        }

        // Percent crops share the natural aspect; pixel crops are in
        // displayed pixels and can only be clamped once that size is known.
        let bounds = match crop.unit {
            CropUnit::Percent => self
                .state
                .natural_size()
                .map(|(w, h)| (w as f64, h as f64)),
            CropUnit::Pixel => Some(
                self.state
                    .displayed_size()
                    .unwrap_or((f64::INFINITY, f64::INFINITY)),
            ),
        };

        match bounds {
            Some((width, height)) => {
                constrain_crop(crop, self.config.aspect.value(), width, height)
            }
            None => crop,
        }
    }

    // ------------------------------------------------------------------
    // Rasterization
    // ------------------------------------------------------------------

    /// Rasterize the committed crop and publish it as the new preview.
    ///
    /// `displayed_width`/`displayed_height` are the current rendered size of
    /// the image element. Returns `Ok(None)` without side effects when there
    /// is no committed crop, no loaded image, or no pixels to draw from.
    ///
    /// # Errors
    ///
    /// - `InvalidGeometry` for a zero or non-finite displayed size
    /// - `EmptyCrop` when the committed crop has no area
    /// - `CanvasTooLarge` when the output would exceed browser canvas limits
    /// - `Encode` / `ObjectUrl` when exporting fails
    pub fn generate(
        &mut self,
        displayed_width: f64,
        displayed_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<Option<&Preview>, CropperError> {
        let Some(crop) = self.state.committed_crop().copied() else {
            debug!("Generate ignored: no committed crop");
            return Ok(None);
        };
        if self.state.natural_size().is_none() {
            debug!("Generate ignored: image not loaded");
            return Ok(None);
        }
        let Some(pixels) = self.pixels.as_ref() else {
            debug!("Generate ignored: source pixels unavailable");
            return Ok(None);
        };

        let geometry = DisplayGeometry::new(
            pixels.width as f64,
            pixels.height as f64,
            displayed_width,
            displayed_height,
        )?;
        let plan = plan_raster(&crop, &geometry, device_pixel_ratio)?;
        let canvas = rasterize(pixels, &plan, self.config.filter)?;
        let png = encode_png(&canvas.pixels, canvas.width, canvas.height)?;

        // Release the superseded preview before publishing the next one
        let stale = self.state.take_preview();
        self.release(stale);

        let url = self
            .urls
            .create(&png, PNG_MIME)
            .inspect_err(|e| warn!("{}", e))?;
        let generation = self.state.next_generation();
        let preview = Preview {
            url,
            width: canvas.width,
            height: canvas.height,
            byte_len: png.len(),
            generation,
        };
        info!(
            "Generated preview #{} ({}x{}, {} bytes)",
            generation,
            preview.width,
            preview.height,
            preview.byte_len
        );

        let replaced = self.state.replace_preview(preview, crop);
        self.release(replaced);
        Ok(self.state.preview())
    }

    // ------------------------------------------------------------------
    // Preview lifecycle
    // ------------------------------------------------------------------

    /// Release the preview and return to `NoImage`.
    pub fn dispose(&mut self) {
        let stale = self.state.reset();
        self.release(stale);
        self.pixels = None;
    }

    fn release(&mut self, preview: Option<Preview>) {
        if let Some(preview) = preview {
            debug!("Revoking preview #{}", preview.generation);
            self.urls.revoke(&preview.url);
        }
    }
}
