//! # Grid Compositor
//!
//! Turns an ordered list of image references into one sprite sheet.
//!
//! ## Pipeline
//!
//! 1. **Layout**: [`GridLayout`] decides columns, canvas size and the cell of
//!    every image. An empty list has no layout and produces no sheet.
//! 2. **Canvas**: a fully transparent RGBA raster of the canvas size.
//! 3. **Cells**: each image is decoded through an [`ImageSource`], stretched
//!    to `cell_size × cell_size` by the SIMD resampler and composited
//!    source-over at its cell's top-left corner.
//!
//! Nothing is cached. Every call decodes every source again, so a changed
//! file on disk shows up on the next composite.
//!
//! ## Decode Failures
//!
//! [`DecodePolicy::Abort`] stops at the first image that fails and returns
//! its [`SpriteError::Decode`]. [`DecodePolicy::Skip`] leaves that image's
//! cell transparent, keeps every other image at its normal position and
//! lists the failure in [`Composite::skipped`].

use std::path::{Path, PathBuf};

use fast_image_resize::Resizer;
use image::{RgbaImage, imageops};
use sprite_scale::cpu::{ScaleError, scale_to_cell};
use sprite_scale::grid::{Cell, GridLayout};
use sprite_scale::presets::{Resample, Size};
use tracing::{debug, info, warn};

use crate::config::GridConfig;
use crate::error::{SpriteError, SpriteResult};

/// Reference to one source image.
///
/// Only the location is owned here; pixels are read on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Human-readable form for logs and error messages.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&PathBuf> for ImageRef {
    fn from(path: &PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ImageRef {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Decodes image references into RGBA pixels.
/// Implement this trait to pull images from somewhere other than the filesystem.
pub trait ImageSource {
    /// Decode `image` into a tightly packed RGBA8 raster.
    fn decode(&self, image: &ImageRef) -> Result<RgbaImage, image::ImageError>;
}

/// Decodes files with the `image` crate, format guessed from content.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn decode(&self, image: &ImageRef) -> Result<RgbaImage, image::ImageError> {
        let decoded = image::ImageReader::open(image.path())?
            .with_guessed_format()?
            .decode()?;
        Ok(decoded.into_rgba8())
    }
}

/// What to do when one source image cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Fail the whole composite.
    #[default]
    Abort,
    /// Leave the image's cell empty and continue.
    Skip,
}

/// An image left out of a sheet under [`DecodePolicy::Skip`].
#[derive(Debug)]
pub struct SkippedImage {
    pub index: usize,
    pub error: SpriteError,
}

/// A composited sprite sheet and the layout it was built from.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
    layout: GridLayout,
}

impl SpriteSheet {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Cell occupied by image `index`, if that index was placed.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        u32::try_from(index).ok().and_then(|i| self.layout.placement(i))
    }
}

/// Result of one composite pass.
#[derive(Debug)]
pub struct Composite {
    pub sheet: SpriteSheet,
    /// Images left out under [`DecodePolicy::Skip`], in input order.
    pub skipped: Vec<SkippedImage>,
}

/// Builds sprite sheets.
///
/// Holds the resampler so its scratch buffers are reused across cells and
/// across calls.
pub struct Compositor {
    resizer: Resizer,
    resample: Resample,
    policy: DecodePolicy,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    /// Compositor with Lanczos3 resampling that aborts on decode failures.
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            resample: Resample::default(),
            policy: DecodePolicy::default(),
        }
    }

    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn resample(&self) -> Resample {
        self.resample
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Composite `images` into a sheet of `config.row_count` rows.
    ///
    /// Returns `Ok(None)` when `images` is empty. `config` is clamped to at
    /// least one row and a 1px cell before use.
    pub fn composite<S: ImageSource + ?Sized>(
        &mut self,
        source: &S,
        images: &[ImageRef],
        config: GridConfig,
    ) -> SpriteResult<Option<Composite>> {
        let config = config.clamped();
        let too_large = |cols: u32| SpriteError::CanvasTooLarge {
            cols,
            rows: config.row_count,
            cell_size: config.cell_size,
        };

        let count = u32::try_from(images.len()).map_err(|_| too_large(u32::MAX))?;
        let Some(layout) = GridLayout::new(count, config.row_count, config.cell_size) else {
            debug!("No images selected, nothing to composite");
            return Ok(None);
        };
        let canvas = layout
            .canvas_size()
            .filter(|size| fits_in_memory(*size))
            .ok_or_else(|| too_large(layout.cols))?;

        debug!(
            images = count,
            rows = layout.rows,
            cols = layout.cols,
            cell_size = layout.cell_side,
            width = canvas.w,
            height = canvas.h,
            "Compositing sprite sheet"
        );

        // Zero-initialised, i.e. fully transparent.
        let mut sheet = RgbaImage::new(canvas.w, canvas.h);
        let mut skipped = Vec::new();

        for cell in layout.cells() {
            let index = cell.index as usize;
            let image_ref = &images[index];
            match self.render_cell(source, index, image_ref, layout.cell_side) {
                Ok(tile) => {
                    imageops::overlay(&mut sheet, &tile, i64::from(cell.x), i64::from(cell.y));
                    debug!(index, col = cell.col, row = cell.row, x = cell.x, y = cell.y, "Placed {}", image_ref.label());
                }
                Err(error) if self.policy == DecodePolicy::Skip && error.is_per_image() => {
                    warn!(index, "Skipping image: {}", error);
                    skipped.push(SkippedImage { index, error });
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            width = canvas.w,
            height = canvas.h,
            placed = count as usize - skipped.len(),
            skipped = skipped.len(),
            "Sprite sheet composited"
        );

        Ok(Some(Composite {
            sheet: SpriteSheet { image: sheet, layout },
            skipped,
        }))
    }

    /// Decode one image and stretch it to a square cell.
    fn render_cell<S: ImageSource + ?Sized>(
        &mut self,
        source: &S,
        index: usize,
        image_ref: &ImageRef,
        cell_side: u32,
    ) -> SpriteResult<RgbaImage> {
        let decoded = source
            .decode(image_ref)
            .map_err(|e| SpriteError::decode(index, image_ref.label(), e))?;
        let (w, h) = decoded.dimensions();

        let scale_error = |source| SpriteError::Scale {
            index,
            cell_size: cell_side,
            source,
        };
        let pixels = scale_to_cell(&mut self.resizer, decoded.as_raw(), Size { w, h }, cell_side, self.resample)
            .map_err(scale_error)?;
        RgbaImage::from_raw(cell_side, cell_side, pixels).ok_or_else(|| scale_error(ScaleError::BufferTooSmall))
    }
}

/// Whether an RGBA raster of `size` can be addressed on this platform.
fn fits_in_memory(size: Size) -> bool {
    u64::from(size.w)
        .checked_mul(u64::from(size.h))
        .and_then(|px| px.checked_mul(4))
        .is_some_and(|bytes| bytes <= isize::MAX as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::collections::HashMap;

    /// Serves solid-colour rasters by path; unknown paths fail to decode.
    struct SolidSource {
        colours: HashMap<PathBuf, (u32, u32, [u8; 4])>,
    }

    impl SolidSource {
        fn new(entries: &[(&str, u32, u32, [u8; 4])]) -> Self {
            Self {
                colours: entries
                    .iter()
                    .map(|(p, w, h, c)| (PathBuf::from(p), (*w, *h, *c)))
                    .collect(),
            }
        }
    }

    impl ImageSource for SolidSource {
        fn decode(&self, image: &ImageRef) -> Result<RgbaImage, image::ImageError> {
            match self.colours.get(image.path()) {
                Some((w, h, c)) => Ok(RgbaImage::from_pixel(*w, *h, Rgba(*c))),
                None => Err(image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such image",
                ))),
            }
        }
    }

    const COLOURS: [[u8; 4]; 5] = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
        [0, 255, 255, 255],
    ];

    fn five_images() -> (SolidSource, Vec<ImageRef>) {
        let names = ["a", "b", "c", "d", "e"];
        let entries: Vec<(&str, u32, u32, [u8; 4])> = names
            .iter()
            .zip(COLOURS)
            .enumerate()
            .map(|(i, (n, c))| (*n, 3 + i as u32, 7, c))
            .collect();
        let refs = names.iter().map(|n| ImageRef::from(*n)).collect();
        (SolidSource::new(&entries), refs)
    }

    #[test]
    fn test_empty_collection_is_noop() {
        let mut compositor = Compositor::new();
        let source = SolidSource::new(&[]);
        let result = compositor.composite(&source, &[], GridConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_five_images_two_rows() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new().with_resample(Resample::Nearest);
        let composite = compositor
            .composite(&source, &images, GridConfig::new(2, 4))
            .unwrap()
            .unwrap();
        let sheet = &composite.sheet;
        assert!(composite.skipped.is_empty());
        assert_eq!((sheet.width(), sheet.height()), (12, 8));

        let expected_origin = [(0, 0), (4, 0), (8, 0), (0, 4), (4, 4)];
        for (i, (x, y)) in expected_origin.iter().enumerate() {
            let cell = sheet.cell(i).unwrap();
            assert_eq!((cell.x, cell.y), (*x, *y));
            for dy in 0..4 {
                for dx in 0..4 {
                    assert_eq!(sheet.image().get_pixel(x + dx, y + dy).0, COLOURS[i], "image {i}");
                }
            }
        }

        // Cell (2, 1) is the unfilled tail of the last row.
        for dy in 0..4 {
            for dx in 0..4 {
                assert_eq!(sheet.image().get_pixel(8 + dx, 4 + dy).0, [0, 0, 0, 0]);
            }
        }
        assert!(sheet.cell(5).is_none());
    }

    #[test]
    fn test_single_row_dimensions() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new();
        let composite = compositor
            .composite(&source, &images[..4], GridConfig::new(1, 128))
            .unwrap()
            .unwrap();
        assert_eq!((composite.sheet.width(), composite.sheet.height()), (512, 128));
        let xs: Vec<u32> = (0..4).map(|i| composite.sheet.cell(i).unwrap().x).collect();
        assert_eq!(xs, vec![0, 128, 256, 384]);
    }

    #[test]
    fn test_filtered_resample_keeps_solid_colour() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new();
        assert_eq!(compositor.resample(), Resample::Lanczos3);
        let composite = compositor
            .composite(&source, &images[..1], GridConfig::new(1, 16))
            .unwrap()
            .unwrap();
        let px = composite.sheet.image().get_pixel(8, 8).0;
        assert!(px[0] >= 254 && px[1] <= 1 && px[2] <= 1 && px[3] >= 254, "{:?}", px);
    }

    #[test]
    fn test_rows_beyond_image_count_stay_empty() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new().with_resample(Resample::Nearest);
        let composite = compositor
            .composite(&source, &images[..2], GridConfig::new(4, 2))
            .unwrap()
            .unwrap();
        let sheet = composite.sheet.image();
        assert_eq!(sheet.dimensions(), (2, 8));
        assert_eq!(sheet.get_pixel(0, 0).0, COLOURS[0]);
        assert_eq!(sheet.get_pixel(0, 2).0, COLOURS[1]);
        assert!((4..8).all(|y| sheet.get_pixel(1, y).0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_config_is_clamped() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new();
        let composite = compositor
            .composite(&source, &images[..3], GridConfig { row_count: 0, cell_size: 0 })
            .unwrap()
            .unwrap();
        assert_eq!(composite.sheet.image().dimensions(), (3, 1));
    }

    #[test]
    fn test_abort_policy_reports_failing_index() {
        let (source, mut images) = five_images();
        images.insert(1, ImageRef::from("missing"));
        let mut compositor = Compositor::new();
        let error = compositor
            .composite(&source, &images, GridConfig::new(2, 4))
            .unwrap_err();
        assert_eq!(error.image_index(), Some(1));
        assert!(matches!(error, SpriteError::Decode { .. }));
    }

    #[test]
    fn test_skip_policy_leaves_cell_empty() {
        let (source, mut images) = five_images();
        images.insert(1, ImageRef::from("missing"));
        let mut compositor = Compositor::new()
            .with_resample(Resample::Nearest)
            .with_policy(DecodePolicy::Skip);
        let composite = compositor
            .composite(&source, &images, GridConfig::new(2, 4))
            .unwrap()
            .unwrap();

        assert_eq!(composite.skipped.len(), 1);
        assert_eq!(composite.skipped[0].index, 1);

        let sheet = composite.sheet.image();
        // 6 images over 2 rows → 3 columns; index 1 sits at (4, 0).
        assert_eq!(sheet.dimensions(), (12, 8));
        assert_eq!(sheet.get_pixel(5, 1).0, [0, 0, 0, 0]);
        assert_eq!(sheet.get_pixel(1, 1).0, COLOURS[0]);
        assert_eq!(sheet.get_pixel(9, 1).0, COLOURS[1]);
    }

    #[test]
    fn test_transparent_source_stays_transparent() {
        let source = SolidSource::new(&[("clear", 5, 5, [10, 20, 30, 0])]);
        let mut compositor = Compositor::new().with_resample(Resample::Nearest);
        let composite = compositor
            .composite(&source, &[ImageRef::from("clear")], GridConfig::new(1, 3))
            .unwrap()
            .unwrap();
        assert!(composite.sheet.image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let (source, images) = five_images();
        let mut compositor = Compositor::new();
        let error = compositor
            .composite(&source, &images, GridConfig::new(1, u32::MAX))
            .unwrap_err();
        assert!(matches!(error, SpriteError::CanvasTooLarge { cols: 5, .. }));
    }
}
