// SPDX-License-Identifier: MIT
//! # Sprite Grid Layout
//!
//! Maps a linear image index to a cell of a fixed-row grid.
//!
//! ## Grid Selection Algorithm
//!
//! - **Columns**: `cols = ceil(image_count / rows)`, computed with integer
//!   division as `n / rows + (n % rows != 0)`. Never zero while `n ≥ 1`.
//! - **Placement**: image `i` goes to `row = i / cols`, `col = i % cols`,
//!   at pixel offset `(col * cell_side, row * cell_side)`.
//! - **Canvas**: `cols * cell_side` wide, `rows * cell_side` tall.
//!
//! The final row may be partial, and with more rows than images some rows stay
//! entirely empty. Both are expected output, not errors.

use crate::presets::Size;

/// Number of columns needed to spread `image_count` images across `row_count`
/// rows. `row_count` is clamped to at least 1.
pub fn columns_per_row(image_count: u32, row_count: u32) -> u32 {
    let rows = row_count.max(1);
    image_count / rows + u32::from(image_count % rows != 0)
}

/// One placed image in grid and pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Position of the image in the input sequence
    pub index: u32,
    pub col: u32,
    pub row: u32,
    /// Left edge in canvas pixels
    pub x: u32,
    /// Top edge in canvas pixels
    pub y: u32,
}

/// Grid geometry for one sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub image_count: u32,
    pub rows: u32,
    pub cols: u32,
    pub cell_side: u32,
}

impl GridLayout {
    /// Compute the layout for `image_count` images.
    ///
    /// Returns `None` for an empty collection: there is nothing to lay out.
    /// `row_count` and `cell_side` are clamped to at least 1.
    pub fn new(image_count: u32, row_count: u32, cell_side: u32) -> Option<Self> {
        if image_count == 0 {
            return None;
        }
        let rows = row_count.max(1);
        Some(Self {
            image_count,
            rows,
            cols: columns_per_row(image_count, rows),
            cell_side: cell_side.max(1),
        })
    }

    /// Canvas dimensions, or `None` when they do not fit in `u32`.
    pub fn canvas_size(&self) -> Option<Size> {
        Some(Size {
            w: self.cols.checked_mul(self.cell_side)?,
            h: self.rows.checked_mul(self.cell_side)?,
        })
    }

    /// Total number of cells, occupied or not.
    pub fn capacity(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Number of cells left transparent.
    pub fn empty_cells(&self) -> u64 {
        self.capacity() - u64::from(self.image_count)
    }

    /// Cell for image `index`, or `None` if `index` is outside `[0, image_count)`.
    pub fn placement(&self, index: u32) -> Option<Cell> {
        if index >= self.image_count {
            return None;
        }
        let row = index / self.cols;
        let col = index % self.cols;
        Some(Cell {
            index,
            col,
            row,
            x: col.saturating_mul(self.cell_side),
            y: row.saturating_mul(self.cell_side),
        })
    }

    /// All placements in input order (row-major).
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.image_count).filter_map(move |i| self.placement(i))
    }
}
