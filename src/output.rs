//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Images in photos/
//! 001 a.jpg
//! 002 b.png
//! 2 images
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 a.jpg (1000x2000)
//!     preview: 300x600
//!     thumbnail: 120x120
//!     exif: none
//! 002 b.png (50x50)
//!     preview: original
//!     thumbnail: 120x120
//! 003 (blank0.jpg)
//!
//! Cache: 1 cached, 1 passed through, 2 encoded (4 total)
//! Modified: yes
//! ```
//!
//! Records that failed show `missing` for the artifacts they lack; the
//! reason is in the message list, which follows when requested.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::gallery::GallerySnapshot;
use crate::naming;
use crate::scan::ScanOutcome;
use crate::types::{ArtifactKind, ImageRecord};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line of a record. Placeholders show their key in parens.
///
/// ```text
/// 001 a.jpg (1000x2000)
/// 004 (blank0.jpg)
/// ```
fn record_header(index: usize, record: &ImageRecord) -> String {
    if record.is_placeholder() {
        format!("{} ({})", format_index(index), record.filename)
    } else {
        format!(
            "{} {} ({}x{})",
            format_index(index),
            record.filename,
            record.width,
            record.height
        )
    }
}

/// Status of one derivative tier for a record.
fn artifact_status(record: &ImageRecord, kind: ArtifactKind) -> String {
    match record.artifact(kind) {
        Some(a) if record.source.as_deref() == Some(a.path.as_path()) => "original".to_string(),
        Some(a) => format!("{}x{}", a.width, a.height),
        None => "missing".to_string(),
    }
}

pub fn format_scan_output(outcome: &ScanOutcome, source: &Path) -> Vec<String> {
    let mut lines = vec![format!("Images in {}", source.display())];
    for (i, record) in outcome.records.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), record.filename));
    }
    if outcome.records.is_empty()
        && let Some(first) = outcome.messages.first()
        && first.starts_with("No such folder")
    {
        lines.push(format!("{}{}", indent(1), first));
    }
    lines.push(match outcome.records.len() {
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    });
    lines
}

pub fn print_scan_output(outcome: &ScanOutcome, source: &Path) {
    for line in format_scan_output(outcome, source) {
        println!("{}", line);
    }
}

/// Format the result of a build. `show_messages` appends the full
/// diagnostic log.
pub fn format_build_output(snapshot: &GallerySnapshot, show_messages: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let feed = snapshot.records.iter().any(|r| r.feed.is_some());

    for (i, record) in snapshot.records.iter().enumerate() {
        lines.push(record_header(i + 1, record));
        if record.is_placeholder() {
            continue;
        }
        let mut kinds = vec![ArtifactKind::Preview, ArtifactKind::Thumbnail];
        if feed {
            kinds.push(ArtifactKind::Feed);
        }
        for kind in kinds {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                kind_label(kind),
                artifact_status(record, kind)
            ));
        }
        if naming::is_jpeg_name(&record.filename) {
            let exif = if record.exif_present { "yes" } else { "none" };
            lines.push(format!("{}exif: {}", indent(1), exif));
        }
    }

    lines.push(String::new());
    lines.push(format!("Cache: {}", snapshot.stats));
    lines.push(format!(
        "Modified: {}",
        if snapshot.modified { "yes" } else { "no" }
    ));
    if snapshot.cancelled {
        lines.push("Cancelled before completion".to_string());
    }

    if show_messages && !snapshot.messages.is_empty() {
        lines.push(String::new());
        lines.push("Messages".to_string());
        for message in &snapshot.messages {
            lines.push(format!("{}{}", indent(1), message));
        }
    }
    lines
}

pub fn print_build_output(snapshot: &GallerySnapshot, show_messages: bool) {
    for line in format_build_output(snapshot, show_messages) {
        println!("{}", line);
    }
}

fn kind_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Preview => "preview",
        ArtifactKind::Thumbnail => "thumbnail",
        ArtifactKind::Feed => "feed",
    }
}
