// SPDX-License-Identifier: MIT
//! # Cell Scaling Plans and Resampling Presets
//!
//! Every source image is forced into a square cell. Aspect ratio is not
//! preserved: a 300×100 source becomes `side × side` exactly, the same way a
//! stretched bitmap would.
//!
//! The resampling filter is selectable. [`Resample::Lanczos3`] is the default
//! because it gives the sharpest downscale of the convolution filters;
//! [`Resample::Nearest`] is there for pixel art, where blending neighbours
//! would smear hard edges.

use fast_image_resize::{FilterType, ResizeAlg};

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// A square of the given edge length.
    pub fn square(side: u32) -> Self {
        Self { w: side, h: side }
    }

    /// Number of bytes an RGBA8 buffer of this size occupies.
    pub fn rgba_len(self) -> usize {
        (self.w as usize) * (self.h as usize) * 4
    }

    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Resampling filter used when scaling a source image into its cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Resample {
    /// Nearest neighbour. No filtering; keeps hard pixel edges.
    Nearest,
    /// Bilinear convolution. Fast, slightly soft.
    Bilinear,
    /// Catmull-Rom cubic convolution.
    CatmullRom,
    /// Lanczos3 convolution. Highest quality, default.
    #[default]
    Lanczos3,
}

impl Resample {
    /// Map the preset to the fast_image_resize algorithm.
    pub fn to_alg(self) -> ResizeAlg {
        match self {
            Resample::Nearest => ResizeAlg::Nearest,
            Resample::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
            Resample::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
            Resample::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
        }
    }

    /// Whether the filter blends neighbouring pixels.
    pub fn is_filtered(self) -> bool {
        !matches!(self, Resample::Nearest)
    }
}

/// Scaling plan for one source image into one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPlan {
    /// Decoded source dimensions
    pub input: Size,
    /// Cell dimensions, always square
    pub out: Size,
    /// Filter to apply
    pub resample: Resample,
}

impl CellPlan {
    /// True when the source already has the cell's dimensions and can be
    /// copied without resampling.
    pub fn is_identity(&self) -> bool {
        self.input == self.out
    }
}

/// Build the plan that stretches `input` to a `cell_side × cell_side` square.
///
/// `cell_side` is clamped to at least 1px.
pub fn build_cell_plan(input: Size, cell_side: u32, resample: Resample) -> CellPlan {
    CellPlan {
        input,
        out: Size::square(cell_side.max(1)),
        resample,
    }
}
