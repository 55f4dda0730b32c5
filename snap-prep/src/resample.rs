// SPDX-License-Identifier: MIT
// CPU resampler built on fast_image_resize (SIMD-accelerated).
// Tightly-packed RGB8 in → RGB8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{ResizeOptions, Resizer};

use crate::plan::{FitPlan, Size};

#[derive(Debug)]
pub enum ResampleError {
    BufferTooSmall,
    DegeneratePlan,
    SourceSizeMismatch,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ResampleError {
    fn from(e: fir::ResizeError) -> Self {
        Self::Fir(e)
    }
}
impl From<fir::ImageBufferError> for ResampleError {
    fn from(e: fir::ImageBufferError) -> Self {
        Self::ImageBuf(e)
    }
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::BufferTooSmall => write!(f, "Output buffer too small"),
            ResampleError::DegeneratePlan => write!(f, "Plan has a zero output dimension"),
            ResampleError::SourceSizeMismatch => {
                write!(f, "Source buffer does not match the declared dimensions")
            }
            ResampleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ResampleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ResampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResampleError::Fir(e) => Some(e),
            ResampleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Main resampling entry point.
/// `src_rgb` must be tightly packed (`src.w * 3` bytes per row).
/// `dst` must be at least `plan.out.w * plan.out.h * 3` bytes.
/// Identity plans copy the source through unchanged.
pub fn resample_rgb(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    src: Size,
    plan: &FitPlan,
    dst: &mut [u8],
) -> Result<(), ResampleError> {
    if plan.is_degenerate() {
        return Err(ResampleError::DegeneratePlan);
    }
    let src_len = (src.w as usize) * (src.h as usize) * 3;
    if src_rgb.len() < src_len {
        return Err(ResampleError::SourceSizeMismatch);
    }
    let dst_len = (plan.out.w as usize) * (plan.out.h as usize) * 3;
    if dst.len() < dst_len {
        return Err(ResampleError::BufferTooSmall);
    }

    if plan.is_identity() {
        dst[..dst_len].copy_from_slice(&src_rgb[..src_len]);
        return Ok(());
    }

    // --- Build source and destination views ---
    let src_view = TypedImageRef::<U8x3>::from_buffer(src.w, src.h, &src_rgb[..src_len])?;
    let mut dst_image = TypedImage::<U8x3>::from_buffer(plan.out.w, plan.out.h, dst)?;

    // --- Resize ---
    // Default convolution (Lanczos3); the pipeline only ever shrinks, where
    // a windowed sinc keeps label text edges sharper than bilinear.
    let opts = ResizeOptions::new();
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}
