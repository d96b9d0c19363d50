//! Shared test utilities: synthetic images written straight to disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("a.jpg"), 1000, 2000);
//! create_test_jpeg_with_orientation(&tmp.path().join("b.jpg"), 40, 20, 6);
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Gradient pattern so crops and rotations are visible in the pixels.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode `img` as a JPEG into memory.
pub fn jpeg_bytes(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(&gradient(width, height))).unwrap();
}

/// Create a small valid PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Minimal big-endian EXIF payload whose IFD0 holds a single Orientation tag.
pub fn orientation_exif(orientation: u16) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    // TIFF header, IFD0 at offset 8
    payload.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
    // one entry: tag 0x0112, SHORT, count 1, value left-aligned
    payload.extend_from_slice(&1u16.to_be_bytes());
    payload.extend_from_slice(&0x0112u16.to_be_bytes());
    payload.extend_from_slice(&3u16.to_be_bytes());
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0, 0]);
    // no next IFD
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload
}

/// Splice an APP1 segment carrying `exif_payload` right after the SOI marker.
pub fn with_app1(jpeg: &[u8], exif_payload: &[u8]) -> Vec<u8> {
    let len = (exif_payload.len() + 2) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + exif_payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(exif_payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Create a JPEG whose EXIF orientation tag is `orientation`.
pub fn create_test_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    let bytes = with_app1(&jpeg_bytes(&gradient(width, height)), &orientation_exif(orientation));
    std::fs::write(path, bytes).unwrap();
}

/// Names of the regular files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
