//! EXIF sidecar files next to the previews.
//!
//! For every JPEG source the previews directory holds exactly one of:
//!
//! - `<filename>.exif`: one line per EXIF field, `[IFD<n>] <tag> - <value>`
//! - `<filename>.noexif`: an empty marker meaning "looked, found nothing"
//!
//! Either file is a cache hit, so the (comparatively slow) metadata read
//! happens once per source. Read failures of any kind count as "no EXIF".

use crate::imaging::tags::read_tag_lines;
use crate::naming;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to write sidecar {path}: {source}")]
pub struct SidecarError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// What [`ensure_sidecar`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarOutcome {
    /// Not a JPEG source; nothing attempted.
    NotApplicable,
    /// A sidecar or marker was already present.
    Cached { exif_present: bool },
    /// EXIF found and dumped into `<filename>.exif`.
    Written,
    /// No EXIF; `<filename>.noexif` created.
    Marked,
}

impl SidecarOutcome {
    pub fn exif_present(self) -> bool {
        matches!(
            self,
            SidecarOutcome::Written | SidecarOutcome::Cached { exif_present: true }
        )
    }

    /// Whether a file was created.
    pub fn wrote(self) -> bool {
        matches!(self, SidecarOutcome::Written | SidecarOutcome::Marked)
    }
}

/// Make sure `filename` has a sidecar or marker in `previews_dir`.
pub fn ensure_sidecar(
    source: &Path,
    filename: &str,
    previews_dir: &Path,
) -> Result<SidecarOutcome, SidecarError> {
    if !naming::is_jpeg_name(filename) {
        return Ok(SidecarOutcome::NotApplicable);
    }

    let exif_path = previews_dir.join(naming::exif_sidecar_name(filename));
    if exif_path.is_file() {
        return Ok(SidecarOutcome::Cached { exif_present: true });
    }
    let marker_path = previews_dir.join(naming::no_exif_marker_name(filename));
    if marker_path.is_file() {
        return Ok(SidecarOutcome::Cached {
            exif_present: false,
        });
    }

    let lines = match read_tag_lines(source) {
        Ok(lines) => lines,
        Err(e) => {
            log::debug!("no EXIF in {}: {}", source.display(), e);
            Vec::new()
        }
    };

    if lines.is_empty() {
        write_file(&marker_path, "")?;
        Ok(SidecarOutcome::Marked)
    } else {
        let mut body = lines.join("\n");
        body.push('\n');
        write_file(&exif_path, &body)?;
        Ok(SidecarOutcome::Written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), SidecarError> {
    std::fs::write(path, contents).map_err(|source| SidecarError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        create_test_jpeg, create_test_jpeg_with_orientation, create_test_png, file_names,
    };
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let previews = tmp.path().join("previews");
        std::fs::create_dir(&previews).unwrap();
        (tmp, previews)
    }

    #[test]
    fn jpeg_with_exif_gets_sidecar() {
        let (tmp, previews) = setup();
        let src = tmp.path().join("a.jpg");
        create_test_jpeg_with_orientation(&src, 10, 10, 1);

        let outcome = ensure_sidecar(&src, "a.jpg", &previews).unwrap();
        assert_eq!(outcome, SidecarOutcome::Written);
        assert!(outcome.exif_present());

        let text = std::fs::read_to_string(previews.join("a.jpg.exif")).unwrap();
        assert!(text.starts_with("[IFD0] Orientation - "), "{text}");
        assert!(!previews.join("a.jpg.noexif").exists());
    }

    #[test]
    fn jpeg_without_exif_gets_empty_marker() {
        let (tmp, previews) = setup();
        let src = tmp.path().join("b.jpg");
        create_test_jpeg(&src, 10, 10);

        let outcome = ensure_sidecar(&src, "b.jpg", &previews).unwrap();
        assert_eq!(outcome, SidecarOutcome::Marked);
        assert!(!outcome.exif_present());
        assert_eq!(std::fs::read(previews.join("b.jpg.noexif")).unwrap(), b"");
    }

    #[test]
    fn unreadable_source_counts_as_no_exif() {
        let (tmp, previews) = setup();
        let src = tmp.path().join("gone.jpg");

        let outcome = ensure_sidecar(&src, "gone.jpg", &previews).unwrap();
        assert_eq!(outcome, SidecarOutcome::Marked);
    }

    #[test]
    fn non_jpeg_is_skipped() {
        let (tmp, previews) = setup();
        let src = tmp.path().join("c.png");
        create_test_png(&src, 10, 10);

        assert_eq!(
            ensure_sidecar(&src, "c.png", &previews).unwrap(),
            SidecarOutcome::NotApplicable
        );
        assert!(file_names(&previews).is_empty());
    }

    #[test]
    fn existing_files_are_cache_hits() {
        let (tmp, previews) = setup();
        let src = tmp.path().join("a.jpg");
        create_test_jpeg_with_orientation(&src, 10, 10, 6);
        std::fs::write(previews.join("a.jpg.exif"), "kept\n").unwrap();
        std::fs::write(previews.join("b.jpg.noexif"), "").unwrap();

        assert_eq!(
            ensure_sidecar(&src, "a.jpg", &previews).unwrap(),
            SidecarOutcome::Cached { exif_present: true }
        );
        assert_eq!(
            ensure_sidecar(&src, "b.jpg", &previews).unwrap(),
            SidecarOutcome::Cached {
                exif_present: false
            }
        );
        // Existing sidecar is not rewritten
        assert_eq!(
            std::fs::read_to_string(previews.join("a.jpg.exif")).unwrap(),
            "kept\n"
        );
    }

    #[test]
    fn missing_previews_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        create_test_jpeg(&src, 10, 10);

        let result = ensure_sidecar(&src, "a.jpg", &tmp.path().join("nope"));
        assert!(result.is_err());
    }
}
