//! Filename rules shared by every stage.
//!
//! The gallery is keyed by bare filename. There is no content hash or version
//! suffix anywhere: the same filename is used for the source image, its
//! preview, its thumbnails and its sidecar files. Everything here is pure and
//! does no I/O.
//!
//! ## Extension extraction
//!
//! The extension is the text after the **last** dot, lower-cased, and only when
//! that dot is neither the first nor the last character:
//!
//! - `"Dawn.JPG"` → `Some("jpg")`
//! - `"archive.tar.gz"` → `Some("gz")`
//! - `".hidden"` → `None` (leading dot only)
//! - `"trailing."` → `None`

use std::cmp::Ordering;

/// Extensions accepted by the scanner, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "tif", "tiff", "png"];

/// Extensions that carry EXIF and are eligible for rotation and sidecars.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Suffix of a sidecar holding the dumped EXIF tags.
pub const EXIF_SUFFIX: &str = ".exif";

/// Suffix of the empty marker recording that an image has no EXIF.
pub const NO_EXIF_SUFFIX: &str = ".noexif";

/// Lower-cased extension of a filename, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    let dot = filename.rfind('.')?;
    if dot == 0 || dot == filename.len() - 1 {
        return None;
    }
    Some(filename[dot + 1..].to_ascii_lowercase())
}

/// Whether a filename passes the image allow-list.
pub fn is_image_name(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether a filename has a jpeg extension.
pub fn is_jpeg_name(filename: &str) -> bool {
    extension_of(filename).is_some_and(|ext| JPEG_EXTENSIONS.contains(&ext.as_str()))
}

/// Ordering used for the record collection: plain lexicographic by filename.
pub fn compare_filenames(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// `<filename>.exif`
pub fn exif_sidecar_name(filename: &str) -> String {
    format!("{filename}{EXIF_SUFFIX}")
}

/// `<filename>.noexif`
pub fn no_exif_marker_name(filename: &str) -> String {
    format!("{filename}{NO_EXIF_SUFFIX}")
}

/// If `name` is a sidecar or marker, the image filename it belongs to.
pub fn sidecar_owner(name: &str) -> Option<&str> {
    name.strip_suffix(NO_EXIF_SUFFIX)
        .or_else(|| name.strip_suffix(EXIF_SUFFIX))
        .filter(|owner| !owner.is_empty())
}

/// Synthetic key for the `index`-th padding placeholder.
pub fn placeholder_key(index: usize) -> String {
    format!("blank{index}.jpg")
}

/// Display title for the `index`-th padding placeholder.
pub fn placeholder_title(index: usize) -> String {
    format!("blank{index}")
}
