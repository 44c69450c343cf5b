//! # Configuration Module
//!
//! Configuration structures and validation for sprite list composition.
//! These are the common interface between the CLI, an interactive session
//! and the core compositor.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Default | Description |
//! |-----------|------|-------|---------|-------------|
//! | `row_count` | `u32` | ≥ 1 | 1 | Rows in the sprite sheet |
//! | `cell_size` | `u32` | ≥ 1 | 256 | Edge length of each square cell in pixels |
//!
//! Neither value has an upper bound here. The sliders of an interactive
//! front end are bounded by [`ControlBounds`]; the text fields are not.
//!
//! ## Text Entry
//!
//! Values typed by the user go through [`parse_row_count`] and
//! [`parse_cell_size`]. Anything that is not a positive integer (empty,
//! garbage, zero, negative, out of range) falls back to the default.
//!
//! ## Examples
//!
//! ```rust
//! use sprite_list_maker::config::{GridConfig, DEFAULT_CELL_SIZE};
//!
//! let config = GridConfig::from_text("3", "abc");
//! assert_eq!(config.row_count, 3);
//! assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
//!
//! // Non-positive numbers are clamped rather than rejected
//! let config = GridConfig::new(0, 64);
//! assert_eq!(config.row_count, 1);
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use crate::error::{SpriteError, SpriteResult};

/// Rows used when none (or nothing usable) is entered.
pub const DEFAULT_ROW_COUNT: u32 = 1;
/// Cell edge length used when none (or nothing usable) is entered.
pub const DEFAULT_CELL_SIZE: u32 = 256;

/// Grid configuration for one sprite sheet.
///
/// Both fields are at least 1 when built through [`GridConfig::new`],
/// [`GridConfig::from_text`] or `Default`. Fields are public, so
/// [`GridConfig::validate`] exists for values assembled by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of rows in the sheet.
    pub row_count: u32,

    /// Edge length of each square cell in pixels.
    pub cell_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_count: DEFAULT_ROW_COUNT,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl GridConfig {
    /// Creates a configuration, clamping both values to at least 1.
    pub fn new(row_count: u32, cell_size: u32) -> Self {
        Self {
            row_count: row_count.max(1),
            cell_size: cell_size.max(1),
        }
    }

    /// Builds a configuration from the raw contents of the two text fields.
    pub fn from_text(row_count: &str, cell_size: &str) -> Self {
        Self {
            row_count: parse_row_count(row_count),
            cell_size: parse_cell_size(cell_size),
        }
    }

    /// Same configuration with both values clamped to at least 1.
    pub fn clamped(self) -> Self {
        Self::new(self.row_count, self.cell_size)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.row_count == 0 {
            return Err(SpriteError::config("row_count", "0", "must be at least 1"));
        }
        if self.cell_size == 0 {
            return Err(SpriteError::config("cell_size", "0", "must be at least 1"));
        }
        Ok(())
    }
}

/// Parse a user-entered row count, falling back to [`DEFAULT_ROW_COUNT`].
pub fn parse_row_count(text: &str) -> u32 {
    parse_positive_or(text, DEFAULT_ROW_COUNT)
}

/// Parse a user-entered cell size, falling back to [`DEFAULT_CELL_SIZE`].
pub fn parse_cell_size(text: &str) -> u32 {
    parse_positive_or(text, DEFAULT_CELL_SIZE)
}

fn parse_positive_or(text: &str, default: u32) -> u32 {
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|v| *v >= 1)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Upper bounds of the two sliders.
///
/// Text entry is unbounded; a typed value above the maximum pins its slider
/// at the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBounds {
    pub row_slider_max: u32,
    pub cell_slider_max: u32,
}

impl Default for ControlBounds {
    fn default() -> Self {
        Self {
            row_slider_max: 16,
            cell_slider_max: 1024,
        }
    }
}

/// Where exported sheets go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory for generated file names. `None` means the platform
    /// pictures directory.
    pub output_dir: Option<PathBuf>,

    /// Exact output path. Takes precedence over `output_dir` and the
    /// generated file name.
    pub output_file: Option<PathBuf>,
}

impl ExportConfig {
    /// Export into `dir` with a generated file name.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
            output_file: None,
        }
    }

    /// Export to exactly `path`.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: None,
            output_file: Some(path.into()),
        }
    }

    /// Directory a generated file name is placed in.
    pub fn resolve_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(crate::export::default_pictures_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.row_count, 1);
        assert_eq!(config.cell_size, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(GridConfig::new(0, 0), GridConfig { row_count: 1, cell_size: 1 });
        assert_eq!(GridConfig::new(4, 32), GridConfig { row_count: 4, cell_size: 32 });
    }

    #[test]
    fn test_text_parsing_falls_back_to_defaults() {
        assert_eq!(parse_row_count("3"), 3);
        assert_eq!(parse_row_count(" 7 "), 7);
        assert_eq!(parse_row_count(""), DEFAULT_ROW_COUNT);
        assert_eq!(parse_row_count("0"), DEFAULT_ROW_COUNT);
        assert_eq!(parse_row_count("-4"), DEFAULT_ROW_COUNT);
        assert_eq!(parse_row_count("two"), DEFAULT_ROW_COUNT);

        assert_eq!(parse_cell_size("64"), 64);
        assert_eq!(parse_cell_size("0"), DEFAULT_CELL_SIZE);
        assert_eq!(parse_cell_size("1.5"), DEFAULT_CELL_SIZE);
        assert_eq!(parse_cell_size("99999999999"), DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridConfig::default();
        assert!(config.validate().is_ok());

        config.row_count = 0;
        assert!(matches!(config.validate(), Err(SpriteError::Config { .. })));
        assert!(config.clamped().validate().is_ok());
        config.row_count = 2;

        config.cell_size = 0;
        assert!(config.validate().is_err());
        assert_eq!(config.clamped().cell_size, 1);
    }

    #[test]
    fn test_export_config_resolution() {
        let config = ExportConfig::in_dir("/tmp/sheets");
        assert_eq!(config.resolve_dir(), PathBuf::from("/tmp/sheets"));

        let config = ExportConfig::to_file("out.png");
        assert_eq!(config.output_file.as_deref(), Some(std::path::Path::new("out.png")));
    }
}
