//! Orphan reaping.
//!
//! After every worker has joined, each derivative directory is listed and
//! files that no longer belong to a gallery record are deleted:
//!
//! - an image-named file whose name is not a record key
//! - a `.exif` / `.noexif` sidecar whose image name is not a record key
//!
//! Anything else (temp files, user notes, subdirectories) is left alone.
//! Running concurrently with generation could delete a file a worker is
//! about to write, so this only ever runs single-threaded after the join.

use crate::naming;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReapReport {
    /// Names of the deleted files.
    pub deleted: Vec<String>,
    /// Deletion failures.
    pub messages: Vec<String>,
}

impl ReapReport {
    /// Whether anything was removed.
    pub fn modified(&self) -> bool {
        !self.deleted.is_empty()
    }
}

/// Whether `name` in a derivative directory belongs to no current record.
pub fn is_orphan(name: &str, keys: &HashSet<&str>) -> bool {
    if naming::is_image_name(name) {
        return !keys.contains(name);
    }
    match naming::sidecar_owner(name) {
        Some(owner) => naming::is_image_name(owner) && !keys.contains(owner),
        None => false,
    }
}

/// Delete orphans directly inside `dir`. A missing directory is a no-op.
pub fn remove_orphans(dir: &Path, keys: &HashSet<&str>) -> ReapReport {
    let mut report = ReapReport::default();
    if !dir.is_dir() {
        return report;
    }

    let orphans: Vec<_> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| is_orphan(name, keys))
        })
        .collect();

    for entry in orphans {
        let name = entry.file_name().to_string_lossy().to_string();
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                log::info!("removed orphan {}", entry.path().display());
                report.deleted.push(name);
            }
            Err(e) => {
                let message = format!("Could not delete {}: {}", entry.path().display(), e);
                log::warn!("{message}");
                report.messages.push(message);
            }
        }
    }
    report
}
