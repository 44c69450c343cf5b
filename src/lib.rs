//! # Sprite List Maker Library
//!
//! Arranges a list of images into a grid ("sprite list") with a chosen row
//! count and square cell size, and exports the result as PNG.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `compositor`: Decodes, stretches and places images on a transparent canvas
//! - `config`: Grid, control and export configuration with clamping rules
//! - `session`: Interactive state (image list, slider/text controls, preview)
//! - `export`: PNG encoding, file naming and output directory handling
//! - `error`: Error type and classification
//!
//! Grid arithmetic and cell resampling live in the `sprite-scale` crate.
//!
//! ## Layout
//!
//! With `n` images and `rows` rows the sheet has `ceil(n / rows)` columns.
//! Images fill rows left-to-right, top-to-bottom; the last row may be partial.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sprite_list_maker::{ImageRef, composite};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let images: Vec<ImageRef> = ["idle.png", "run_0.png", "run_1.png"]
//!     .into_iter()
//!     .map(ImageRef::from)
//!     .collect();
//!
//! if let Some(sheet) = composite(&images, 1, 64)? {
//!     assert_eq!((sheet.width(), sheet.height()), (192, 64));
//! }
//! # Ok(())
//! # }
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod session;

/// Re-export error types for convenience
pub use error::{ErrorSeverity, HasSeverity, SpriteError, SpriteResult};

pub use compositor::{Compositor, DecodePolicy, FsImageSource, ImageRef, ImageSource, SpriteSheet};
pub use config::{ExportConfig, GridConfig};
pub use session::SpriteSession;

/// Re-export commonly used types from the scaling crate
pub use sprite_scale::grid::{Cell, GridLayout};
pub use sprite_scale::presets::Resample;

/// Composite files from disk into a sprite sheet.
///
/// Convenience wrapper over [`Compositor::composite`] with the filesystem
/// source, Lanczos3 resampling and abort-on-failure. `row_count` and
/// `cell_size` are clamped to at least 1.
///
/// # Returns
///
/// `Ok(None)` when `images` is empty, otherwise the composited sheet.
///
/// # Errors
///
/// [`SpriteError::Decode`] for the first image that cannot be read, or
/// [`SpriteError::CanvasTooLarge`] when the sheet cannot be allocated.
pub fn composite(images: &[ImageRef], row_count: u32, cell_size: u32) -> SpriteResult<Option<SpriteSheet>> {
    let config = GridConfig::new(row_count, cell_size);
    Ok(Compositor::new()
        .composite(&FsImageSource, images, config)?
        .map(|composite| composite.sheet))
}
