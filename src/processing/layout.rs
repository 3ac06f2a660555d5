//! Aspect-preserving fit of content into a fixed container.
//!
//! Content spans the full container on one axis and is centered on the
//! other. Portrait content (`aspect < 1`) spans the height; everything else,
//! square content included, spans the width.

use crate::error::{Error, Result};

/// Scaled size and top-left offset of content placed inside a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitResult {
    /// Integer `(x, y, w, h)` rectangle for drawing into a pixel grid.
    pub fn pixel_rect(&self) -> (i64, i64, u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (
            self.offset_x.round() as i64,
            self.offset_y.round() as i64,
            w,
            h,
        )
    }
}

pub fn fit(
    container_w: f64,
    container_h: f64,
    content_w: f64,
    content_h: f64,
) -> FitResult {
    let aspect = content_w / content_h;
    if aspect < 1.0 {
        let width = container_h * aspect;
        FitResult {
            width,
            height: container_h,
            offset_x: (container_w - width) / 2.0,
            offset_y: 0.0,
        }
    } else {
        let height = container_w / aspect;
        FitResult {
            width: container_w,
            height,
            offset_x: 0.0,
            offset_y: (container_h - height) / 2.0,
        }
    }
}

/// Same as [`fit`], but rejects zero, negative and non-finite dimensions.
pub fn try_fit(
    container_w: f64,
    container_h: f64,
    content_w: f64,
    content_h: f64,
) -> Result<FitResult> {
    for (name, value) in [
        ("container width", container_w),
        ("container height", container_h),
        ("content width", content_w),
        ("content height", content_h),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidDimension { name, value });
        }
    }
    Ok(fit(container_w, container_h, content_w, content_h))
}
