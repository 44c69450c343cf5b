//! # Sprite Sheet Export
//!
//! Encodes a sheet as PNG and writes it out.
//!
//! Generated file names follow `YYYYMMDD_RRRRRR_spritelistmaker.png`: the
//! local date, then a random number in `[0, 999999]` zero-padded to six
//! digits. The default directory is the platform pictures directory, created
//! on demand.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use rand::Rng;
use tracing::{debug, info};

use crate::compositor::SpriteSheet;
use crate::config::ExportConfig;
use crate::error::{SpriteError, SpriteResult};

/// Largest value of the random file name component.
pub const MAX_NAME_SUFFIX: u32 = 999_999;

/// File name for a sheet exported on `date` with random component `suffix`.
pub fn export_file_name(date: NaiveDate, suffix: u32) -> String {
    format!("{}_{:06}_spritelistmaker.png", date.format("%Y%m%d"), suffix)
}

/// Random component of a generated file name, in `[0, MAX_NAME_SUFFIX]`.
pub fn random_suffix() -> u32 {
    rand::thread_rng().gen_range(0..=MAX_NAME_SUFFIX)
}

/// File name for a sheet exported now.
pub fn generate_file_name() -> String {
    export_file_name(Local::now().date_naive(), random_suffix())
}

/// Platform pictures directory, falling back to `~/Pictures`, then the
/// working directory.
pub fn default_pictures_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Encode `image` as PNG (lossless, best compression) and write it to `path`.
pub fn write_png(image: &RgbaImage, path: &Path) -> SpriteResult<()> {
    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .map_err(|source| SpriteError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(bytes = bytes.len(), "Encoded PNG for {}", path.display());

    std::fs::write(path, &bytes).map_err(|e| SpriteError::io("write file", path, e))
}

/// Write `sheet` where `config` says and return the path written.
///
/// Missing directories are created.
pub fn export_sprite_sheet(sheet: &SpriteSheet, config: &ExportConfig) -> SpriteResult<PathBuf> {
    let path = match &config.output_file {
        Some(file) => {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            file.clone()
        }
        None => {
            let dir = config.resolve_dir();
            ensure_dir(&dir)?;
            dir.join(generate_file_name())
        }
    };

    write_png(sheet.image(), &path)?;
    info!(
        width = sheet.width(),
        height = sheet.height(),
        "Exported sprite sheet to {}",
        path.display()
    );
    Ok(path)
}

fn ensure_dir(dir: &Path) -> SpriteResult<()> {
    if !dir.exists() {
        debug!("Creating directory {}", dir.display());
    }
    std::fs::create_dir_all(dir).map_err(|e| SpriteError::io("create directory", dir, e))
}
