// SPDX-License-Identifier: MIT
//! # Fit Planning
//!
//! Computes the output dimensions for a photo before it is resampled and
//! re-encoded for upload. The rule is width-based: images wider than the
//! configured bound shrink to exactly that width with the height scaled
//! proportionally; narrower images pass through untouched.
//!
//! ## Why a width bound
//!
//! Upload cost grows with pixel count, but the model's ability to read the
//! printed text on a nutrition label depends on the horizontal resolution of
//! the label lines. Clamping width keeps label text legible at a predictable
//! payload size.
//!
//! ## Rounding
//!
//! All computation is floating-point, rounded to integers at the end. No
//! upscaling: inputs already within the bound keep their dimensions. A
//! computed dimension of zero is reported as-is so the caller can reject the
//! input instead of silently clamping it.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// Complete fit plan computed from input dimensions and the width bound.
/// Contains all information needed to perform the actual resampling.
#[derive(Clone, Copy, Debug)]
pub struct FitPlan {
    /// Original input dimensions
    pub input: Size,
    /// Width bound the plan was computed against
    pub max_width: u32,
    /// Final computed output dimensions
    pub out: Size,
}

impl FitPlan {
    /// True when the plan leaves the image untouched (input already fits).
    pub fn is_identity(&self) -> bool {
        self.out == self.input
    }

    /// True when rounding produced a zero dimension. Such plans must be
    /// rejected by the caller; resampling to zero pixels is not meaningful.
    pub fn is_degenerate(&self) -> bool {
        self.out.w == 0 || self.out.h == 0
    }
}

/// Compute a fit plan for the given input dimensions.
///
/// If `input.w > max_width`, the scale factor is `max_width / input.w` and
/// the output is `(max_width, round(input.h * scale))`. Otherwise the input
/// dimensions are returned unchanged (never upscale).
///
/// # Performance
/// O(1) computation with minimal floating-point operations
pub fn build_plan(input: Size, max_width: u32) -> FitPlan {
    let out = if input.w > max_width {
        let scale = max_width as f64 / input.w as f64;
        Size {
            w: max_width,
            h: (input.h as f64 * scale).round() as u32,
        }
    } else {
        input
    };
    FitPlan {
        input,
        max_width,
        out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_input_passes_through() {
        let plan = build_plan(Size { w: 800, h: 600 }, 1200);
        assert!(plan.is_identity());
        assert_eq!(plan.out, Size { w: 800, h: 600 });
    }

    #[test]
    fn exact_width_is_not_rescaled() {
        let plan = build_plan(Size { w: 1200, h: 900 }, 1200);
        assert!(plan.is_identity());
    }

    #[test]
    fn wide_input_clamps_to_bound() {
        let plan = build_plan(Size { w: 2000, h: 1000 }, 1200);
        assert_eq!(plan.out, Size { w: 1200, h: 600 });
        assert!(!plan.is_identity());
    }

    #[test]
    fn height_rounds_to_nearest() {
        // 1999 -> scale 1200/1999, 1000 * 0.60030... = 600.3 -> 600
        let plan = build_plan(Size { w: 1999, h: 1000 }, 1200);
        assert_eq!(plan.out.w, 1200);
        assert_eq!(plan.out.h, 600);
    }

    #[test]
    fn aspect_ratio_preserved_within_one_pixel() {
        let input = Size { w: 3024, h: 4032 };
        let plan = build_plan(input, 1200);
        let expected = input.h as f64 * (plan.out.w as f64 / input.w as f64);
        assert!((plan.out.h as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn plan_is_idempotent_on_its_own_output() {
        let first = build_plan(Size { w: 5000, h: 3000 }, 1200);
        let second = build_plan(first.out, 1200);
        assert!(second.is_identity());
        assert_eq!(second.out, first.out);
    }

    #[test]
    fn extreme_aspect_ratio_degenerates_to_zero_height() {
        // 1 * (1200 / 3000) = 0.4 -> rounds to 0
        let plan = build_plan(Size { w: 3000, h: 1 }, 1200);
        assert!(plan.is_degenerate());
    }
}
