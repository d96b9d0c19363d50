//! Decode and encode through the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, TIFF) | `image::ImageReader` (pure Rust decoders) |
//! | Header-only size probe | `image::image_dimensions` |
//! | Encode in the source format | `image::ImageBuffer::write_to` |
//! | Atomic replace | `tempfile::NamedTempFile::persist` |
//!
//! Every decoded image is flattened to 8-bit RGB once, right after decoding.
//! All derivatives are written from that buffer, so they are RGB too.

use image::{ImageFormat, ImageReader, RgbImage};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::naming;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ImagingError + '_ {
    move |source| ImagingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Output format for a file, chosen by its extension.
///
/// Only the scanner's allow-list is accepted, so a derivative is always
/// written in the same format as its source.
pub fn format_for_path(path: &Path) -> Result<ImageFormat, ImagingError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(naming::extension_of)
        .filter(|ext| naming::IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .and_then(ImageFormat::from_extension)
        .ok_or_else(|| ImagingError::UnsupportedFormat(path.to_path_buf()))
}

/// Load and decode an image from disk into an RGB buffer.
pub fn decode_rgb(path: &Path) -> Result<RgbImage, ImagingError> {
    let reader = ImageReader::open(path)
        .map_err(io_error(path))?
        .with_guessed_format()
        .map_err(io_error(path))?;
    let img = reader.decode().map_err(|source| ImagingError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgb8())
}

/// Read width and height from the image header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), ImagingError> {
    image::image_dimensions(path).map_err(|source| ImagingError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode `img` as `format` and move it into place at `path`.
///
/// The bytes go to a temporary file in the destination directory first and
/// are renamed over `path` only after encoding succeeded, so a crash never
/// leaves a truncated image behind. The temp name carries no image extension.
pub fn write_image(img: &RgbImage, path: &Path, format: ImageFormat) -> Result<(), ImagingError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(path))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        img.write_to(&mut writer, format)
            .map_err(|source| ImagingError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(io_error(path))?;
    }
    tmp.persist(path).map_err(|source| ImagingError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, create_test_png};
    use tempfile::TempDir;

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_for_path(Path::new("a.JPG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("a.jpeg")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_for_path(Path::new("a.png")).unwrap(), ImageFormat::Png);
        assert_eq!(format_for_path(Path::new("a.gif")).unwrap(), ImageFormat::Gif);
        assert_eq!(format_for_path(Path::new("a.tif")).unwrap(), ImageFormat::Tiff);
        assert_eq!(format_for_path(Path::new("a.tiff")).unwrap(), ImageFormat::Tiff);
    }

    #[test]
    fn format_rejects_unlisted_extensions() {
        assert!(matches!(
            format_for_path(Path::new("a.webp")),
            Err(ImagingError::UnsupportedFormat(_))
        ));
        assert!(format_for_path(Path::new("noext")).is_err());
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let img = decode_rgb(&path).unwrap();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = decode_rgb(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(ImagingError::Io { .. })));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(decode_rgb(&path).is_err());
    }

    #[test]
    fn probe_reads_header_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_png(&path, 64, 48);

        assert_eq!(probe_dimensions(&path).unwrap(), (64, 48));
    }

    #[test]
    fn write_image_roundtrips_through_each_format() {
        let tmp = TempDir::new().unwrap();
        let img = RgbImage::from_fn(40, 30, |x, y| image::Rgb([x as u8, y as u8, 90]));

        for name in ["out.jpg", "out.png", "out.gif", "out.tiff"] {
            let path = tmp.path().join(name);
            let format = format_for_path(&path).unwrap();
            write_image(&img, &path, format).unwrap();
            assert_eq!(probe_dimensions(&path).unwrap(), (40, 30), "{name}");
        }
    }

    #[test]
    fn write_image_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let img = RgbImage::new(8, 8);
        let path = tmp.path().join("only.png");
        write_image(&img, &path, ImageFormat::Png).unwrap();

        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("only.png")]);
    }

    #[test]
    fn write_image_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let img = RgbImage::new(8, 8);
        let path = tmp.path().join("missing").join("x.png");
        assert!(matches!(
            write_image(&img, &path, ImageFormat::Png),
            Err(ImagingError::Io { .. })
        ));
    }
}
