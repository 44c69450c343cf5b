//! # Sprite Session
//!
//! State behind an interactive sprite list editor: the ordered image
//! collection, the row count and cell size controls, and the current preview.
//!
//! ## Interaction Model
//!
//! Every interaction recomputes the whole sheet on the calling thread:
//! 1. **Import**: [`SpriteSession::add_images`] appends references (one or
//!    many) and refreshes the preview. Nothing is ever removed.
//! 2. **Slider**: moving a slider writes its position into the matching text
//!    field, then refreshes.
//! 3. **Text**: editing a text field moves the slider (pinned to its maximum)
//!    and refreshes. Text that is not a positive integer resets the value to
//!    its default.
//! 4. **Export**: [`SpriteSession::export`] decodes all sources again and
//!    writes a PNG. Failures are logged and swallowed; the caller only learns
//!    that nothing was written.
//!
//! Each fresh preview is handed to every registered [`PreviewSink`]. An empty
//! collection produces no sheet, and the previous preview stays as it was.
//!
//! ```rust,no_run
//! use sprite_list_maker::session::SpriteSession;
//!
//! let mut session = SpriteSession::new();
//! session.subscribe(|sheet: &sprite_list_maker::SpriteSheet| {
//!     println!("preview {}x{}", sheet.width(), sheet.height());
//! });
//! session.add_images(["walk_0.png", "walk_1.png", "walk_2.png"])?;
//! session.slide_rows(3)?;
//! if let Some(path) = session.export() {
//!     println!("saved {}", path.display());
//! }
//! # Ok::<(), sprite_list_maker::SpriteError>(())
//! ```

use std::path::PathBuf;

use sprite_scale::presets::Resample;
use tracing::{debug, error, warn};

use crate::compositor::{Compositor, DecodePolicy, FsImageSource, ImageRef, ImageSource, SkippedImage, SpriteSheet};
use crate::config::{ControlBounds, ExportConfig, GridConfig, parse_cell_size, parse_row_count};
use crate::error::{HasSeverity, SpriteResult};
use crate::export::export_sprite_sheet;

/// Receives every freshly composited preview.
pub trait PreviewSink {
    fn present(&mut self, sheet: &SpriteSheet);
}

impl<F: FnMut(&SpriteSheet)> PreviewSink for F {
    fn present(&mut self, sheet: &SpriteSheet) {
        self(sheet)
    }
}

/// One numeric parameter edited through a bounded slider and a free text field.
#[derive(Debug, Clone)]
pub struct ParamControl {
    slider: u32,
    slider_max: u32,
    text: String,
    parse: fn(&str) -> u32,
}

impl ParamControl {
    fn new(initial: u32, slider_max: u32, parse: fn(&str) -> u32) -> Self {
        let mut control = Self {
            slider: 0,
            slider_max,
            text: String::new(),
            parse,
        };
        control.enter_text(&initial.to_string());
        control
    }

    /// Row count control.
    pub fn row_count(initial: u32, slider_max: u32) -> Self {
        Self::new(initial, slider_max, parse_row_count)
    }

    /// Cell size control.
    pub fn cell_size(initial: u32, slider_max: u32) -> Self {
        Self::new(initial, slider_max, parse_cell_size)
    }

    /// Effective value: the text field parsed with the clamp law applied.
    pub fn value(&self) -> u32 {
        (self.parse)(&self.text)
    }

    pub fn slider(&self) -> u32 {
        self.slider
    }

    pub fn slider_max(&self) -> u32 {
        self.slider_max
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Move the slider; the text field shows the new position verbatim.
    pub fn slide_to(&mut self, position: u32) {
        self.slider = position.min(self.slider_max);
        self.text = self.slider.to_string();
    }

    /// Replace the text field; the slider follows the parsed value.
    pub fn enter_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.slider = self.value().min(self.slider_max);
    }
}

/// The two grid controls.
#[derive(Debug, Clone)]
pub struct GridControls {
    pub rows: ParamControl,
    pub cell_size: ParamControl,
}

impl GridControls {
    pub fn new(initial: GridConfig, bounds: ControlBounds) -> Self {
        Self {
            rows: ParamControl::row_count(initial.row_count, bounds.row_slider_max),
            cell_size: ParamControl::cell_size(initial.cell_size, bounds.cell_slider_max),
        }
    }

    /// Grid configuration currently described by the controls.
    pub fn config(&self) -> GridConfig {
        GridConfig::new(self.rows.value(), self.cell_size.value())
    }
}

impl Default for GridControls {
    fn default() -> Self {
        Self::new(GridConfig::default(), ControlBounds::default())
    }
}

/// Interactive sprite list state.
pub struct SpriteSession<S: ImageSource = FsImageSource> {
    source: S,
    images: Vec<ImageRef>,
    controls: GridControls,
    compositor: Compositor,
    export: ExportConfig,
    preview: Option<SpriteSheet>,
    skipped: Vec<SkippedImage>,
    sinks: Vec<Box<dyn PreviewSink>>,
}

impl SpriteSession<FsImageSource> {
    /// Session reading images from the filesystem with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SpriteSessionBuilder<FsImageSource> {
        SpriteSessionBuilder::new(FsImageSource)
    }
}

impl Default for SpriteSession<FsImageSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> SpriteSession<S> {
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn controls(&self) -> &GridControls {
        &self.controls
    }

    pub fn config(&self) -> GridConfig {
        self.controls.config()
    }

    /// Last successfully composited sheet.
    pub fn preview(&self) -> Option<&SpriteSheet> {
        self.preview.as_ref()
    }

    /// Images left out of the current preview under [`DecodePolicy::Skip`].
    pub fn skipped(&self) -> &[SkippedImage] {
        &self.skipped
    }

    /// Register a sink for future previews.
    pub fn subscribe(&mut self, sink: impl PreviewSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Append one image and refresh.
    pub fn add_image(&mut self, image: impl Into<ImageRef>) -> SpriteResult<bool> {
        self.add_images(std::iter::once(image))
    }

    /// Append images in order and refresh.
    pub fn add_images<I>(&mut self, images: I) -> SpriteResult<bool>
    where
        I: IntoIterator,
        I::Item: Into<ImageRef>,
    {
        let before = self.images.len();
        self.images.extend(images.into_iter().map(Into::into));
        debug!(added = self.images.len() - before, total = self.images.len(), "Images imported");
        self.refresh()
    }

    pub fn slide_rows(&mut self, position: u32) -> SpriteResult<bool> {
        self.controls.rows.slide_to(position);
        self.refresh()
    }

    pub fn enter_rows(&mut self, text: &str) -> SpriteResult<bool> {
        self.controls.rows.enter_text(text);
        self.refresh()
    }

    pub fn slide_cell_size(&mut self, position: u32) -> SpriteResult<bool> {
        self.controls.cell_size.slide_to(position);
        self.refresh()
    }

    pub fn enter_cell_size(&mut self, text: &str) -> SpriteResult<bool> {
        self.controls.cell_size.enter_text(text);
        self.refresh()
    }

    /// Recompute the preview from the current images and controls.
    ///
    /// Returns `Ok(true)` when a new preview was produced and `Ok(false)` when
    /// there are no images. On error the previous preview is kept.
    pub fn refresh(&mut self) -> SpriteResult<bool> {
        let config = self.controls.config();
        let Some(composite) = self.compositor.composite(&self.source, &self.images, config)? else {
            return Ok(false);
        };

        for sink in &mut self.sinks {
            sink.present(&composite.sheet);
        }
        self.preview = Some(composite.sheet);
        self.skipped = composite.skipped;
        Ok(true)
    }

    /// Recompute the sheet from the sources and write it out.
    ///
    /// Returns the written path, or `None` if nothing was written: no images,
    /// or a failure that has already been logged.
    pub fn export(&mut self) -> Option<PathBuf> {
        match self.try_export() {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                warn!("Export requested with no images selected");
                None
            }
            Err(e) => {
                error!(category = e.category(), severity = ?e.severity(), "Export failed: {}", e);
                None
            }
        }
    }

    /// Like [`SpriteSession::export`] but returns failures to the caller.
    pub fn try_export(&mut self) -> SpriteResult<Option<PathBuf>> {
        let config = self.controls.config();
        let Some(composite) = self.compositor.composite(&self.source, &self.images, config)? else {
            return Ok(None);
        };
        export_sprite_sheet(&composite.sheet, &self.export).map(Some)
    }
}

/// Fluent configuration for [`SpriteSession`].
pub struct SpriteSessionBuilder<S: ImageSource> {
    source: S,
    grid: GridConfig,
    bounds: ControlBounds,
    policy: DecodePolicy,
    resample: Resample,
    export: ExportConfig,
}

impl<S: ImageSource> SpriteSessionBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            grid: GridConfig::default(),
            bounds: ControlBounds::default(),
            policy: DecodePolicy::default(),
            resample: Resample::default(),
            export: ExportConfig::default(),
        }
    }

    /// Swap the image source.
    pub fn source<T: ImageSource>(self, source: T) -> SpriteSessionBuilder<T> {
        SpriteSessionBuilder {
            source,
            grid: self.grid,
            bounds: self.bounds,
            policy: self.policy,
            resample: self.resample,
            export: self.export,
        }
    }

    /// Initial control values.
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn bounds(mut self, bounds: ControlBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    pub fn export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    pub fn build(self) -> SpriteSession<S> {
        SpriteSession {
            source: self.source,
            images: Vec::new(),
            controls: GridControls::new(self.grid, self.bounds),
            compositor: Compositor::new()
                .with_resample(self.resample)
                .with_policy(self.policy),
            export: self.export,
            preview: None,
            skipped: Vec::new(),
            sinks: Vec::new(),
        }
    }
}
