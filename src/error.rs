//! # Error Handling
//!
//! One error type, [`SpriteError`], covers every failure the library can
//! report. Variants split into two groups that callers treat differently:
//!
//! - **Per-image errors** (`Decode`, `Scale`): tied to one input image by its
//!   index. A composite running with [`DecodePolicy::Skip`] records these and
//!   carries on; with [`DecodePolicy::Abort`] the first one ends the pass.
//! - **Sheet errors** (`CanvasTooLarge`, `Config`, `Encode`, `Io`): the
//!   whole request cannot complete.
//!
//! ## Classification
//!
//! Errors carry a severity through [`HasSeverity`] and a short category name,
//! which the CLI uses for its log lines.
//!
//! ```rust
//! use sprite_list_maker::error::{ErrorSeverity, HasSeverity, SpriteError};
//!
//! let error = SpriteError::config("row_count", "0", "must be at least 1");
//! assert_eq!(error.category(), "config");
//! assert_eq!(error.severity(), ErrorSeverity::Error);
//! assert!(!error.is_per_image());
//! ```
//!
//! [`DecodePolicy::Skip`]: crate::compositor::DecodePolicy::Skip
//! [`DecodePolicy::Abort`]: crate::compositor::DecodePolicy::Abort

use std::path::PathBuf;

use sprite_scale::cpu::ScaleError;
use thiserror::Error;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Affects a single image; the rest of the sheet can still be built
    Warning,
    /// The current request fails
    Error,
    /// Nothing further can be done without user intervention
    Fatal,
}

/// Base error type for the sprite list library
#[derive(Debug, Error)]
pub enum SpriteError {
    /// A source image could not be read or decoded
    #[error("failed to decode image #{index} ({source_ref}): {source}")]
    Decode {
        index: usize,
        source_ref: String,
        source: image::ImageError,
    },
    /// A decoded image could not be resampled into its cell
    #[error("failed to scale image #{index} into a {cell_size}px cell: {source}")]
    Scale {
        index: usize,
        cell_size: u32,
        source: ScaleError,
    },
    /// The canvas dimensions overflow the raster size limits
    #[error("a {cols}x{rows} grid of {cell_size}px cells is too large to allocate")]
    CanvasTooLarge { cols: u32, rows: u32, cell_size: u32 },
    /// Configuration validation errors
    #[error("invalid {field} '{value}': {reason}")]
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// PNG encoding failed
    #[error("failed to encode PNG {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// I/O errors
    #[error("{operation} failed for {}: {source}", .path.display())]
    Io {
        operation: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SpriteError {
    /// Create a decode error for the image at `index`
    pub fn decode(index: usize, source_ref: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            index,
            source_ref: source_ref.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Short category name for logging
    pub fn category(&self) -> &'static str {
        match self {
            SpriteError::Decode { .. } => "decode",
            SpriteError::Scale { .. } => "scale",
            SpriteError::CanvasTooLarge { .. } => "canvas",
            SpriteError::Config { .. } => "config",
            SpriteError::Encode { .. } => "encode",
            SpriteError::Io { .. } => "io",
        }
    }

    /// Whether the error concerns a single input image
    pub fn is_per_image(&self) -> bool {
        self.image_index().is_some()
    }

    /// Index of the offending input image, for per-image errors
    pub fn image_index(&self) -> Option<usize> {
        match self {
            SpriteError::Decode { index, .. } | SpriteError::Scale { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type for sprite list operations
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Trait for errors that have severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for SpriteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SpriteError::Decode { .. } | SpriteError::Scale { .. } => ErrorSeverity::Warning,
            SpriteError::CanvasTooLarge { .. } | SpriteError::Config { .. } => ErrorSeverity::Error,
            SpriteError::Encode { .. } => ErrorSeverity::Error,
            SpriteError::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::PermissionDenied => ErrorSeverity::Fatal,
                _ => ErrorSeverity::Error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn unsupported() -> image::ImageError {
        image::ImageError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
    }

    #[test]
    fn test_decode_error_is_per_image() {
        let error = SpriteError::decode(3, "a.png", unsupported());
        assert!(error.is_per_image());
        assert_eq!(error.image_index(), Some(3));
        assert_eq!(error.category(), "decode");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert!(error.to_string().contains("#3"));
        assert!(error.to_string().contains("a.png"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_io_error_is_not_per_image() {
        let error = SpriteError::io(
            "create directory",
            "/nope",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!error.is_per_image());
        assert_eq!(error.category(), "io");
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
        assert!(error.to_string().starts_with("create directory failed for /nope"));
    }

    #[test]
    fn test_canvas_error_message() {
        let error = SpriteError::CanvasTooLarge { cols: 3, rows: 1, cell_size: u32::MAX };
        assert!(error.to_string().contains("3x1"));
        assert!(error.severity() > ErrorSeverity::Warning);
    }
}
