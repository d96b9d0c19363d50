//! EXIF tag access through `kamadak-exif` (imported as `exif`).
//!
//! Two readers: the orientation tag for the rotation pass, and a flat text
//! dump of every field for the sidecar writer. Both read only the container
//! headers, never the pixel data.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The EXIF orientation value of an image, if one can be read.
///
/// Any failure (missing file, no APP1 segment, malformed IFD) yields `None`.
pub fn read_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}

/// Every EXIF field of an image as one `[IFD<n>] <tag> - <value>` line.
///
/// `Err(exif::Error::NotFound)` means the file has no EXIF at all.
pub fn read_tag_lines(path: &Path) -> Result<Vec<String>, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader)?;
    Ok(exif
        .fields()
        .map(|field| {
            format!(
                "[IFD{}] {} - {}",
                field.ifd_num.index(),
                field.tag,
                field.display_value().with_unit(&exif)
            )
        })
        .collect())
}
