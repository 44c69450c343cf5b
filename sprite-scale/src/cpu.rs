// SPDX-License-Identifier: MIT
// CPU cell scaler built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{ResizeOptions, Resizer};

use crate::presets::{build_cell_plan, CellPlan, Resample, Size};

#[derive(Debug)]
pub enum ScaleError {
    EmptySource,
    SourceTooSmall,
    BufferTooSmall,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::EmptySource => write!(f, "Source image has zero width or height"),
            ScaleError::SourceTooSmall => write!(f, "Source buffer shorter than its declared size"),
            ScaleError::BufferTooSmall => write!(f, "Output buffer too small"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Main scaling entry point.
/// `src_rgba` must be tightly packed, `plan.input.w * plan.input.h * 4` bytes.
/// `dst` must hold at least `plan.out.w * plan.out.h * 4` bytes (RGBA).
pub fn scale_rgba_cpu(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    plan: &CellPlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    if plan.input.is_empty() {
        return Err(ScaleError::EmptySource);
    }
    let src_len = plan.input.rgba_len();
    if src_rgba.len() < src_len {
        return Err(ScaleError::SourceTooSmall);
    }
    let dst_len = plan.out.rgba_len();
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall);
    }

    if plan.is_identity() {
        dst[..dst_len].copy_from_slice(&src_rgba[..src_len]);
        return Ok(());
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(plan.input.w, plan.input.h, &src_rgba[..src_len])?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;

    // Alpha-aware: transparent source pixels must not bleed colour into
    // their opaque neighbours.
    let opts = ResizeOptions::new()
        .resize_alg(plan.resample.to_alg())
        .use_alpha(true);

    resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;
    Ok(())
}

/// Scale a tightly packed RGBA source into a freshly allocated
/// `cell_side × cell_side` buffer.
pub fn scale_to_cell(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    src: Size,
    cell_side: u32,
    resample: Resample,
) -> Result<Vec<u8>, ScaleError> {
    let plan = build_cell_plan(src, cell_side, resample);
    let mut out = vec![0u8; plan.out.rgba_len()];
    scale_rgba_cpu(resizer, src_rgba, &plan, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: Size, px: [u8; 4]) -> Vec<u8> {
        let mut buf = vec![0u8; size.rgba_len()];
        for p in buf.chunks_exact_mut(4) {
            p.copy_from_slice(&px);
        }
        buf
    }

    #[test]
    fn test_downscale_solid_colour() {
        let mut resizer = Resizer::new();
        let src = solid(Size { w: 8, h: 4 }, [255, 0, 0, 255]);
        let out = scale_to_cell(&mut resizer, &src, Size { w: 8, h: 4 }, 4, Resample::Lanczos3).unwrap();
        assert_eq!(out.len(), 4 * 4 * 4);
        for p in out.chunks_exact(4) {
            assert!(p[0] >= 254, "red channel drifted: {:?}", p);
            assert!(p[1] <= 1 && p[2] <= 1, "unexpected colour: {:?}", p);
            assert!(p[3] >= 254, "alpha drifted: {:?}", p);
        }
    }

    #[test]
    fn test_nearest_upscale_is_exact() {
        let mut resizer = Resizer::new();
        // 2x1: left green, right blue
        let mut src = Vec::new();
        src.extend_from_slice(&[0, 255, 0, 255]);
        src.extend_from_slice(&[0, 0, 255, 255]);
        let out = scale_to_cell(&mut resizer, &src, Size { w: 2, h: 1 }, 4, Resample::Nearest).unwrap();
        for row in out.chunks_exact(16) {
            assert_eq!(&row[0..4], &[0, 255, 0, 255]);
            assert_eq!(&row[12..16], &[0, 0, 255, 255]);
        }
    }

    #[test]
    fn test_identity_copies() {
        let mut resizer = Resizer::new();
        let src: Vec<u8> = (0..(3 * 3 * 4)).map(|v| v as u8).collect();
        let out = scale_to_cell(&mut resizer, &src, Size::square(3), 3, Resample::Lanczos3).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_buffer_checks() {
        let mut resizer = Resizer::new();
        let plan = build_cell_plan(Size::square(4), 2, Resample::Bilinear);

        let mut small = vec![0u8; 4];
        let src = solid(Size::square(4), [1, 2, 3, 4]);
        assert!(matches!(
            scale_rgba_cpu(&mut resizer, &src, &plan, &mut small),
            Err(ScaleError::BufferTooSmall)
        ));

        let mut dst = vec![0u8; plan.out.rgba_len()];
        assert!(matches!(
            scale_rgba_cpu(&mut resizer, &src[..8], &plan, &mut dst),
            Err(ScaleError::SourceTooSmall)
        ));

        let empty = build_cell_plan(Size { w: 0, h: 4 }, 2, Resample::Bilinear);
        assert!(matches!(
            scale_rgba_cpu(&mut resizer, &[], &empty, &mut dst),
            Err(ScaleError::EmptySource)
        ));
    }
}
