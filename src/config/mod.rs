//! # Configuration Module
//!
//! This module provides grid, control and export configuration for sprite list composition.

pub mod config;

pub use config::{
    ControlBounds, DEFAULT_CELL_SIZE, DEFAULT_ROW_COUNT, ExportConfig, GridConfig, parse_cell_size,
    parse_row_count,
};
