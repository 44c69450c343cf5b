use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use sprite_list_maker::config::{ExportConfig, GridConfig};
use sprite_list_maker::session::SpriteSession;
use sprite_list_maker::{DecodePolicy, GridLayout, Resample};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

/// Sprite list maker:
/// - picks images in the order given
/// - lays them out over a fixed number of rows
/// - writes the sheet as a PNG
#[derive(Parser, Debug)]
#[command(name = "spritelist")]
#[command(version, about = "🧩 Arrange images into a sprite sheet and export it as PNG")]
#[command(long_about = "Arrange images into a grid sprite sheet and export it as PNG.
Images fill rows left-to-right, top-to-bottom; each one is stretched to a square cell.
Row count and cell size accept any text: values that are not positive integers fall back to 1 row / 256px.")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Composite images into a sheet and write it as PNG
    Export {
        /// Source images, in placement order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Number of rows
        #[arg(short, long, default_value = "1")]
        rows: String,

        /// Edge length of each square cell in pixels
        #[arg(short = 's', long, default_value = "256")]
        cell_size: String,

        /// Directory for the generated file name (default: your pictures directory)
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,

        /// Exact output file, overrides --out-dir and the generated name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave unreadable images as empty cells instead of failing
        #[arg(long)]
        skip_unreadable: bool,

        /// Resampling filter for stretching images into cells
        #[arg(short, long, value_enum, default_value_t = Resample::Lanczos3)]
        filter: Resample,
    },

    /// Print the grid geometry for a number of images without reading any
    Layout {
        /// Number of images
        count: u32,

        /// Number of rows
        #[arg(short, long, default_value = "1")]
        rows: String,

        /// Edge length of each square cell in pixels
        #[arg(short = 's', long, default_value = "256")]
        cell_size: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;

    match cli.command {
        Commands::Export {
            images,
            rows,
            cell_size,
            out_dir,
            output,
            skip_unreadable,
            filter,
        } => {
            let export = ExportConfig {
                output_dir: out_dir,
                output_file: output,
            };
            let policy = if skip_unreadable {
                DecodePolicy::Skip
            } else {
                DecodePolicy::Abort
            };
            run_export(images, &rows, &cell_size, export, policy, filter)
        }

        Commands::Layout {
            count,
            rows,
            cell_size,
            json,
        } => run_layout(count, GridConfig::from_text(&rows, &cell_size), json),
    }
}

fn run_export(
    images: Vec<PathBuf>,
    rows: &str,
    cell_size: &str,
    export: ExportConfig,
    policy: DecodePolicy,
    filter: Resample,
) -> Result<()> {
    let mut session = SpriteSession::builder()
        .export(export)
        .policy(policy)
        .resample(filter)
        .build();

    // Controls first, so importing triggers the only preview pass.
    session.enter_rows(rows)?;
    session.enter_cell_size(cell_size)?;
    session
        .add_images(images)
        .context("failed to composite sprite sheet")?;

    for skipped in session.skipped() {
        warn!("Left cell {} empty: {}", skipped.index, skipped.error);
    }

    match session.try_export().context("failed to export sprite sheet")? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("no images to export"),
    }
}

fn run_layout(count: u32, config: GridConfig, as_json: bool) -> Result<()> {
    let Some(layout) = GridLayout::new(count, config.row_count, config.cell_size) else {
        if as_json {
            println!("{}", json!({ "images": 0, "sheet": null }));
        } else {
            println!("No images: nothing to lay out");
        }
        return Ok(());
    };
    let canvas = layout
        .canvas_size()
        .with_context(|| format!("{}x{} cells of {}px overflow the canvas size", layout.cols, layout.rows, layout.cell_side))?;

    if as_json {
        let cells: Vec<_> = layout
            .cells()
            .map(|c| json!({ "index": c.index, "col": c.col, "row": c.row, "x": c.x, "y": c.y }))
            .collect();
        let report = json!({
            "images": layout.image_count,
            "rows": layout.rows,
            "columns": layout.cols,
            "cell_size": layout.cell_side,
            "width": canvas.w,
            "height": canvas.h,
            "empty_cells": layout.empty_cells(),
            "cells": cells,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} images → {} rows × {} columns of {}px = {}x{} ({} empty cells)",
        layout.image_count,
        layout.rows,
        layout.cols,
        layout.cell_side,
        canvas.w,
        canvas.h,
        layout.empty_cells()
    );
    for cell in layout.cells() {
        println!("  #{:<4} col {:<3} row {:<3} at ({}, {})", cell.index, cell.col, cell.row, cell.x, cell.y);
    }
    Ok(())
}
