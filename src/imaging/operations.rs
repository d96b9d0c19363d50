//! High-level image operations.
//!
//! These functions combine the pure calculations with pixel work and the
//! codec. They take an already decoded buffer: the caller decodes a source
//! once and hands the same buffer to every derivative it needs.

use super::calculations::{PreviewPlan, calculate_preview_plan, calculate_square_crop};
use super::codec::{ImagingError, write_image};
use crate::config::BoxSize;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Smooth resample to exact dimensions.
pub fn scale(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Centered square cut of the buffer. A square input is returned as a copy.
pub fn crop_square(img: &RgbImage) -> RgbImage {
    let crop = calculate_square_crop(img.dimensions());
    imageops::crop_imm(img, crop.x, crop.y, crop.side, crop.side).to_image()
}

/// What [`create_preview`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Source fits the box; nothing was written.
    PassThrough,
    /// A scaled preview was written with these dimensions.
    Written { width: u32, height: u32 },
}

/// Scale `img` into `bounds` and write it to `output` as `format`.
///
/// Sources that already fit are not written; see
/// [`calculate_preview_plan`] for the sizing rules.
pub fn create_preview(
    img: &RgbImage,
    bounds: BoxSize,
    output: &Path,
    format: ImageFormat,
) -> Result<PreviewOutcome> {
    match calculate_preview_plan(img.dimensions(), (bounds.width, bounds.height)) {
        PreviewPlan::PassThrough => Ok(PreviewOutcome::PassThrough),
        PreviewPlan::Scale { width, height } => {
            write_image(&scale(img, width, height), output, format)?;
            Ok(PreviewOutcome::Written { width, height })
        }
    }
}

/// Crop `img` to a centered square, scale it to exactly `size` and write it.
///
/// Always writes, whatever the source size.
pub fn create_square_thumbnail(
    img: &RgbImage,
    size: BoxSize,
    output: &Path,
    format: ImageFormat,
) -> Result<()> {
    let square = crop_square(img);
    write_image(&scale(&square, size.width, size.height), output, format)
}
