//! Directory scanning.
//!
//! Lists the images directly inside a source directory (no recursion) and
//! turns each into an [`ImageRecord`]:
//!
//! ```text
//! photos/
//! ├── a.jpg            # record
//! ├── B.PNG            # record (extension match is case-insensitive)
//! ├── notes.txt        # ignored
//! ├── previews/        # ignored (directories never match)
//! └── thumbnails/
//! ```
//!
//! Records come back sorted with [`naming::compare_filenames`]. A missing
//! directory is not an error: the scan yields no records and a diagnostic.

use crate::naming;
use crate::types::ImageRecord;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Records found plus the diagnostic lines produced while scanning.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<ImageRecord>,
    pub messages: Vec<String>,
}

/// Scan `dir` for images.
///
/// With `lower_case_names`, matching files are first renamed to their
/// lower-case form. A rename that fails, or would clobber an existing file,
/// is reported and the file keeps its name.
pub fn scan_directory(dir: &Path, lower_case_names: bool) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    if !dir.is_dir() {
        let message = format!("No such folder: {}", dir.display());
        log::warn!("{message}");
        outcome.messages.push(message);
        return outcome;
    }

    let mut names = list_image_names(dir);
    if lower_case_names {
        names = names
            .into_iter()
            .map(|name| lower_case_file(dir, name, &mut outcome.messages))
            .collect();
    }
    names.sort_by(|a, b| naming::compare_filenames(a, b));

    outcome
        .messages
        .push(format!("Number of image files: {}", names.len()));
    for name in names {
        log::debug!("found image {name}");
        outcome.messages.push(format!("Found image: {name}"));
        let path = dir.join(&name);
        outcome.records.push(ImageRecord::new(name, path));
    }
    outcome
}

/// Names of the regular files directly in `dir` that pass the allow-list.
///
/// Symlinks are resolved: a link to an image file counts as an image, a link
/// to a directory does not, and a dangling link is logged and skipped.
fn list_image_names(dir: &Path) -> Vec<String> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
        .filter(|name| naming::is_image_name(name))
        .collect()
}

/// Rename `dir/name` to its lower-case form, returning the name it ends up with.
fn lower_case_file(dir: &Path, name: String, messages: &mut Vec<String>) -> String {
    let lower = name.to_lowercase();
    if lower == name {
        return name;
    }
    let from = dir.join(&name);
    let to: PathBuf = dir.join(&lower);
    if to.exists() {
        let message = format!("Not renaming {name}: {lower} already exists");
        log::warn!("{message}");
        messages.push(message);
        return name;
    }
    match std::fs::rename(&from, &to) {
        Ok(()) => {
            log::info!("renamed {name} to {lower}");
            lower
        }
        Err(e) => {
            let message = format!("Could not rename {name} to {lower}: {e}");
            log::warn!("{message}");
            messages.push(message);
            name
        }
    }
}
