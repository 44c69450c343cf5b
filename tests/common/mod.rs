//! Common test utilities and helpers for the sprite list tests
//!
//! Fixture images are written into a caller-owned temporary directory so each
//! test cleans up after itself.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};

/// Distinct opaque colours, one per fixture image.
pub const PALETTE: [[u8; 4]; 6] = [
    [255, 0, 0, 255],   // Red
    [0, 255, 0, 255],   // Green
    [0, 0, 255, 255],   // Blue
    [255, 255, 0, 255], // Yellow
    [0, 255, 255, 255], // Cyan
    [255, 0, 255, 255], // Magenta
];

/// Write a solid-colour image in the given format.
pub fn write_solid(dir: &Path, name: &str, w: u32, h: u32, colour: [u8; 4], format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(w, h, Rgba(colour))
        .save_with_format(&path, format)
        .expect("fixture image should be writable");
    path
}

/// Write `count` solid PNGs of varying sizes, coloured from [`PALETTE`].
pub fn write_palette_pngs(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let name = format!("sprite_{i}.png");
            write_solid(dir, &name, 5 + i as u32, 9 - (i as u32 % 4), PALETTE[i % PALETTE.len()], ImageFormat::Png)
        })
        .collect()
}

/// Write a file that no decoder accepts.
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("fixture file should be writable");
    path
}

/// Assert every pixel of a `side`-pixel cell at `(x, y)` equals `expected`.
pub fn assert_cell(sheet: &RgbaImage, x: u32, y: u32, side: u32, expected: [u8; 4]) {
    for dy in 0..side {
        for dx in 0..side {
            let px = sheet.get_pixel(x + dx, y + dy).0;
            assert_eq!(px, expected, "pixel ({}, {})", x + dx, y + dy);
        }
    }
}
