//! # Compositor Module
//!
//! This module contains the grid compositor that turns selected images into a sprite sheet.

pub mod compositor;

// Re-export commonly used types for convenience
pub use compositor::{
    Composite, Compositor, DecodePolicy, FsImageSource, ImageRef, ImageSource, SkippedImage,
    SpriteSheet,
};
