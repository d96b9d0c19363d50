//! The artifact pipeline: one worker's pass over its slice of records.
//!
//! For every real record the pipeline makes sure three derivatives and an
//! EXIF sidecar exist:
//!
//! ```text
//! <out>/previews/<f>      scaled into the preview box (skipped when the source fits)
//! <out>/thumbnails/<f>    centered square crop, scaled to the thumbnail box
//! <out>/feed/<f>          same as the thumbnail, feed box (feed enabled only)
//! <out>/previews/<f>.exif or .noexif
//! ```
//!
//! ## Decode once
//!
//! The header is probed first. Pixels are decoded only when a missing
//! derivative actually needs them, and then exactly once: the same RGB buffer
//! feeds the preview, the thumbnail and the feed thumbnail.
//!
//! ## Failures
//!
//! A failing step never aborts the run. The error is rendered into the
//! worker's message log (and `log::warn!`) and the pipeline moves on to the
//! next step or record.
//!
//! ## Ownership
//!
//! A worker receives a `&mut [ImageRecord]` chunk that no other worker can
//! see, and every output path is derived from the record's own filename, so
//! workers never touch the same file or record. Results flow back as a
//! [`WorkerReport`] that the coordinator merges after the join.

use crate::cache::{self, CacheStats};
use crate::cancel::CancelToken;
use crate::config::{BoxSize, GalleryConfig};
use crate::imaging::{
    PreviewOutcome, PreviewPlan, calculate_preview_plan, correct_orientation, create_preview,
    create_square_thumbnail, decode_rgb, format_for_path, probe_dimensions,
};
use crate::naming;
use crate::sidecar::ensure_sidecar;
use crate::types::{Artifact, ArtifactKind, ImageRecord};
use image::{ImageFormat, RgbImage};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Everything a worker needs besides its records. Shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    pub output_dir: PathBuf,
    pub url_base: String,
    pub preview: BoxSize,
    pub thumbnail: BoxSize,
    /// `Some` when feed thumbnails are enabled.
    pub feed: Option<BoxSize>,
    pub rotate: bool,
}

impl PipelineContext {
    pub fn new(output_dir: impl Into<PathBuf>, url_base: impl Into<String>, config: &GalleryConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            url_base: url_base.into(),
            preview: config.preview,
            thumbnail: config.thumbnail,
            feed: config.feed.then_some(config.feed_thumbnail),
            rotate: config.rotate,
        }
    }

    /// Derivative tiers in use, in processing order.
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        let mut kinds = vec![ArtifactKind::Preview, ArtifactKind::Thumbnail];
        if self.feed.is_some() {
            kinds.push(ArtifactKind::Feed);
        }
        kinds
    }

    pub fn artifact_dir(&self, kind: ArtifactKind) -> PathBuf {
        cache::artifact_dir(&self.output_dir, kind)
    }

    pub fn artifact_path(&self, kind: ArtifactKind, filename: &str) -> PathBuf {
        cache::artifact_path(&self.output_dir, kind, filename)
    }

    pub fn source_url(&self, filename: &str) -> String {
        format!("{}/{}", self.url_base, filename)
    }

    pub fn artifact_url(&self, kind: ArtifactKind, filename: &str) -> String {
        format!("{}/{}/{}", self.url_base, kind.dir_name(), filename)
    }

    fn square_box(&self, kind: ArtifactKind) -> BoxSize {
        match kind {
            ArtifactKind::Feed => self.feed.unwrap_or(self.thumbnail),
            _ => self.thumbnail,
        }
    }
}

/// What one worker did. Merged by the coordinator in partition order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    /// A derivative, sidecar or rotated source was written.
    pub modified: bool,
    /// The cancel token stopped this worker early.
    pub cancelled: bool,
    pub messages: Vec<String>,
    pub stats: CacheStats,
}

impl WorkerReport {
    pub fn merge(&mut self, other: WorkerReport) {
        self.modified |= other.modified;
        self.cancelled |= other.cancelled;
        self.messages.extend(other.messages);
        self.stats += other.stats;
    }

    fn fail(&mut self, filename: &str, err: impl Display) {
        let message = format!("{filename}: {err}");
        log::warn!("{message}");
        self.messages.push(message);
    }
}

/// Create the output directories for every tier in use.
///
/// Failures are returned as messages; the pipeline will report the
/// individual writes that fail as a consequence.
pub fn prepare_output_dirs(ctx: &PipelineContext) -> Vec<String> {
    let mut messages = Vec::new();
    for kind in ctx.kinds() {
        let dir = ctx.artifact_dir(kind);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            let message = format!("Could not create {}: {}", dir.display(), e);
            log::warn!("{message}");
            messages.push(message);
        }
    }
    messages
}

/// Rewrite sideways JPEG sources upright, for a whole slice.
///
/// Runs before any derivative of the slice is generated so that every
/// derivative is made from the corrected pixels.
pub fn correct_orientations(records: &[ImageRecord], cancel: &CancelToken) -> WorkerReport {
    let mut report = WorkerReport::default();
    for record in records {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        let Some(source) = &record.source else {
            continue;
        };
        if !naming::is_jpeg_name(&record.filename) {
            continue;
        }
        match correct_orientation(source) {
            Ok(Some(rotation)) => {
                log::info!("rotated {} by {}°", record.filename, rotation.degrees());
                report.modified = true;
            }
            Ok(None) => {}
            Err(e) => report.fail(&record.filename, format_args!("rotation failed: {e}")),
        }
    }
    report
}

/// Run the pipeline over one worker's records.
///
/// Output directories must already exist (see [`prepare_output_dirs`]).
pub fn process_records(
    records: &mut [ImageRecord],
    ctx: &PipelineContext,
    cancel: &CancelToken,
) -> WorkerReport {
    let mut report = if ctx.rotate {
        correct_orientations(records, cancel)
    } else {
        WorkerReport::default()
    };

    for record in records.iter_mut() {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        if record.is_placeholder() {
            continue;
        }
        process_record(record, ctx, &mut report);
    }
    report
}

fn process_record(record: &mut ImageRecord, ctx: &PipelineContext, report: &mut WorkerReport) {
    let Some(source) = record.source.clone() else {
        return;
    };
    let filename = record.filename.clone();
    log::debug!("processing {filename}");

    let (width, height) = match probe_dimensions(&source) {
        Ok(dims) => dims,
        Err(e) => {
            report.fail(&filename, e);
            return;
        }
    };
    record.width = width;
    record.height = height;
    record.url = Some(ctx.source_url(&filename));

    let preview_path = ctx.artifact_path(ArtifactKind::Preview, &filename);
    let preview_plan = match cache::lookup(&preview_path) {
        Some(_) => None,
        None => Some(calculate_preview_plan(
            (width, height),
            (ctx.preview.width, ctx.preview.height),
        )),
    };
    let missing_squares: Vec<ArtifactKind> = ctx
        .kinds()
        .into_iter()
        .filter(|&kind| kind != ArtifactKind::Preview)
        .filter(|&kind| cache::lookup(&ctx.artifact_path(kind, &filename)).is_none())
        .collect();

    let needs_pixels =
        matches!(preview_plan, Some(PreviewPlan::Scale { .. })) || !missing_squares.is_empty();
    let pixels = if needs_pixels {
        match format_for_path(&source)
            .and_then(|format| decode_rgb(&source).map(|img| (img, format)))
        {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                report.fail(&filename, e);
                None
            }
        }
    } else {
        None
    };

    // Preview
    match preview_plan {
        None => {
            report.stats.hit();
            match probe_dimensions(&preview_path) {
                Ok((w, h)) => record.set_artifact(
                    ArtifactKind::Preview,
                    Artifact {
                        path: preview_path,
                        url: ctx.artifact_url(ArtifactKind::Preview, &filename),
                        width: w,
                        height: h,
                    },
                ),
                Err(e) => report.fail(&filename, e),
            }
        }
        Some(PreviewPlan::PassThrough) => {
            report.stats.pass();
            record.set_artifact(ArtifactKind::Preview, passthrough_artifact(record, &source, ctx));
        }
        Some(PreviewPlan::Scale { .. }) => {
            if let Some((img, format)) = &pixels {
                write_preview(record, img, *format, &preview_path, &source, ctx, report);
            }
        }
    }

    // Thumbnails
    for kind in ctx.kinds().into_iter().filter(|&k| k != ArtifactKind::Preview) {
        let path = ctx.artifact_path(kind, &filename);
        let size = ctx.square_box(kind);
        if !missing_squares.contains(&kind) {
            report.stats.hit();
        } else if let Some((img, format)) = &pixels {
            if let Err(e) = create_square_thumbnail(img, size, &path, *format) {
                report.fail(&filename, e);
                continue;
            }
            log::debug!("wrote {}", path.display());
            report.stats.miss();
            report.modified = true;
        } else {
            continue;
        }
        record.set_artifact(
            kind,
            Artifact {
                path,
                url: ctx.artifact_url(kind, &filename),
                width: size.width,
                height: size.height,
            },
        );
    }

    // Sidecar
    match ensure_sidecar(&source, &filename, &ctx.artifact_dir(ArtifactKind::Preview)) {
        Ok(outcome) => {
            record.exif_present = outcome.exif_present();
            report.modified |= outcome.wrote();
        }
        Err(e) => report.fail(&filename, e),
    }
}

fn write_preview(
    record: &mut ImageRecord,
    img: &RgbImage,
    format: ImageFormat,
    path: &Path,
    source: &Path,
    ctx: &PipelineContext,
    report: &mut WorkerReport,
) {
    match create_preview(img, ctx.preview, path, format) {
        Ok(PreviewOutcome::Written { width, height }) => {
            log::debug!("wrote {}", path.display());
            report.stats.miss();
            report.modified = true;
            record.set_artifact(
                ArtifactKind::Preview,
                Artifact {
                    path: path.to_path_buf(),
                    url: ctx.artifact_url(ArtifactKind::Preview, &record.filename),
                    width,
                    height,
                },
            );
        }
        Ok(PreviewOutcome::PassThrough) => {
            report.stats.pass();
            let artifact = passthrough_artifact(record, source, ctx);
            record.set_artifact(ArtifactKind::Preview, artifact);
        }
        Err(e) => report.fail(&record.filename, e),
    }
}

/// The original file standing in for its own preview.
fn passthrough_artifact(record: &ImageRecord, source: &Path, ctx: &PipelineContext) -> Artifact {
    Artifact {
        path: source.to_path_buf(),
        url: ctx.source_url(&record.filename),
        width: record.width,
        height: record.height,
    }
}
