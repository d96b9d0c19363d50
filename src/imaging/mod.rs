//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF** | `kamadak-exif` (orientation tag, sidecar tag dump) |
//! | **Preview** | fit into a box, Lanczos3 |
//! | **Thumbnail** | centered square crop + Lanczos3 |
//! | **Orientation** | affine quarter/half turn + JPEG re-encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Codec**: decode, header probe, atomic encode
//! - **Operations**: High-level functions combining calculations + codec
//! - **Orientation**: EXIF-driven rotation of source files
//! - **Tags**: EXIF reading

pub mod calculations;
pub mod codec;
pub mod operations;
pub mod orientation;
pub mod tags;

pub use calculations::{PreviewPlan, calculate_padding, calculate_preview_plan};
pub use codec::{ImagingError, decode_rgb, format_for_path, probe_dimensions, write_image};
pub use operations::{PreviewOutcome, create_preview, create_square_thumbnail};
pub use orientation::{Rotation, correct_orientation};
