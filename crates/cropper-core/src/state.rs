//! The authoritative cropper state.
//!
//! All mutable state of the component lives in one [`CropperState`]. Each
//! event has a transition method that only touches this record; anything with
//! an outside effect (revoking a superseded preview URL) is handed back to the
//! caller instead of performed here.
//!
//! ```text
//! NoImage -> ImageLoaded -> CropCommitted -> Rasterized
//!    ^            ^               ^               |
//!    |  new source|   image load  |  new commit   |
//!    +------------+---------------+---------------+
//! ```

use crate::preview::Preview;
use crate::region::CropRegion;
use crate::source::ImageSource;

/// Coarse progress through the crop pipeline, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No source, or a source whose image has not finished loading.
    NoImage,
    ImageLoaded,
    CropCommitted,
    /// The preview reflects the committed crop.
    Rasterized,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NoImage => "no-image",
            Phase::ImageLoaded => "image-loaded",
            Phase::CropCommitted => "crop-committed",
            Phase::Rasterized => "rasterized",
        }
    }
}

/// Identifies one asynchronous load. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct CropperState {
    source: Option<ImageSource>,
    natural_size: Option<(u32, u32)>,
    displayed_size: Option<(f64, f64)>,
    live_crop: Option<CropRegion>,
    committed_crop: Option<CropRegion>,
    preview: Option<Preview>,
    /// The committed crop the current preview was generated from.
    rendered_crop: Option<CropRegion>,
    load_epoch: u64,
    generation: u64,
}

impl CropperState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.source.is_none() || self.natural_size.is_none() {
            return Phase::NoImage;
        }

        match (&self.committed_crop, &self.preview) {
            (None, _) => Phase::ImageLoaded,
            (Some(committed), Some(_)) if self.rendered_crop.as_ref() == Some(committed) => {
                Phase::Rasterized
            }
            (Some(_), _) => Phase::CropCommitted,
        }
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.natural_size
    }

    pub fn displayed_size(&self) -> Option<(f64, f64)> {
        self.displayed_size
    }

    /// The crop as currently dragged.
    pub fn live_crop(&self) -> Option<&CropRegion> {
        self.live_crop.as_ref()
    }

    /// The crop rasterization reads.
    pub fn committed_crop(&self) -> Option<&CropRegion> {
        self.committed_crop.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Start a load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_epoch += 1;
        LoadTicket(self.load_epoch)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.load_epoch
    }

    /// Install a new source. Crops and image metrics from the previous source
    /// are dropped; the superseded preview is returned for release.
    #[must_use = "the returned preview must be released"]
    pub fn set_source(&mut self, source: ImageSource) -> Option<Preview> {
        self.source = Some(source);
        self.natural_size = None;
        self.displayed_size = None;
        self.live_crop = None;
        self.committed_crop = None;
        self.take_preview()
    }

    /// The image element finished loading at `natural_size`.
    ///
    /// `initial` becomes the live crop; it is also committed when `commit` is
    /// set. Any older committed crop is discarded either way.
    pub fn image_loaded(&mut self, natural_size: (u32, u32), initial: CropRegion, commit: bool) {
        self.natural_size = Some(natural_size);
        self.live_crop = Some(initial);
        self.committed_crop = commit.then_some(initial);
    }

    pub fn set_displayed_size(&mut self, width: f64, height: f64) {
        self.displayed_size = Some((width, height));
    }

    /// Drag in progress. Never touches the committed crop.
    pub fn update_live(&mut self, crop: CropRegion) {
        self.live_crop = Some(crop);
    }

    /// Drag finished.
    pub fn commit(&mut self, crop: CropRegion) {
        self.live_crop = Some(crop);
        self.committed_crop = Some(crop);
    }

    /// Allocate the next preview sequence number.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Detach the current preview so it can be released.
    #[must_use = "the returned preview must be released"]
    pub fn take_preview(&mut self) -> Option<Preview> {
        self.rendered_crop = None;
        self.preview.take()
    }

    /// Install a preview generated from `rendered_from`. Returns the one it
    /// replaces, if any.
    #[must_use = "the returned preview must be released"]
    pub fn replace_preview(
        &mut self,
        preview: Preview,
        rendered_from: CropRegion,
    ) -> Option<Preview> {
        self.rendered_crop = Some(rendered_from);
        self.preview.replace(preview)
    }

    /// Back to `NoImage`. Outstanding load tickets become stale.
    #[must_use = "the returned preview must be released"]
    pub fn reset(&mut self) -> Option<Preview> {
        let preview = self.take_preview();
        let generation = self.generation;
        let load_epoch = self.load_epoch + 1;
        *self = Self {
            load_epoch,
            generation,
            ..Self::default()
        };
        preview
    }
}
