// SPDX-License-Identifier: MIT
//! # sprite-scale: Grid Geometry and Cell Resampling for Sprite Sheets
//!
//! This crate holds the two pieces of a sprite sheet that do not care where
//! pixels come from or where they end up:
//!
//! - [`grid`]: how many columns a sheet needs and where image `i` lands
//! - [`presets`]: sizes, resampling filters and per-cell scaling plans
//! - [`cpu`]: RGBA resampling into a caller-provided cell buffer using
//!   fast_image_resize (SIMD accelerated)
//!
//! ## Layout Rules
//!
//! Rows are filled left-to-right, top-to-bottom. The column count is the
//! ceiling of `image_count / row_count`, so the last row may be partial and a
//! row count larger than the image count leaves whole rows empty.
//!
//! ## Usage Example
//!
//! ```rust
//! use sprite_scale::grid::GridLayout;
//!
//! let layout = GridLayout::new(5, 2, 64).unwrap();
//! assert_eq!(layout.cols, 3);
//!
//! let canvas = layout.canvas_size().unwrap();
//! assert_eq!((canvas.w, canvas.h), (192, 128));
//!
//! let last = layout.placement(4).unwrap();
//! assert_eq!((last.col, last.row), (1, 1));
//! assert_eq!((last.x, last.y), (64, 64));
//! ```

pub mod cpu;
pub mod grid;
pub mod presets;
