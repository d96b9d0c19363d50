//! The gallery: scan, process, reap, pad.
//!
//! [`Gallery::build`] runs one complete pass over a source directory:
//!
//! ```text
//! scan ─→ prepare dirs ─→ pipeline (sequential, or one rayon task per partition)
//!                                   │
//!                                 join
//!                                   │
//!                     reap orphans ─→ pad to full rows
//! ```
//!
//! ## Parallel builds
//!
//! The record list is split into `W` contiguous chunks with
//! [`partition_mut`], where `W` is [`effective_threads`]. A dedicated rayon
//! pool of `W` threads runs one task per chunk and `install` blocks until
//! all of them are done. Each task owns its chunk exclusively and returns a
//! [`WorkerReport`]; the reports are merged in partition order after the
//! join, so the result is identical to a sequential run.
//!
//! The reaper and the padding step never overlap with workers.

use crate::cache::CacheStats;
use crate::cancel::CancelToken;
use crate::config::{GalleryConfig, effective_threads};
use crate::imaging::calculate_padding;
use crate::naming;
use crate::partition::partition_mut;
use crate::process::{self, PipelineContext, WorkerReport};
use crate::reap::remove_orphans;
use crate::scan::scan_directory;
use crate::types::ImageRecord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Locations derived once from the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryPaths {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// `<url_root>/<source dir name>`
    pub url_base: String,
}

impl GalleryPaths {
    pub fn new(source_dir: &Path, output_dir: &Path, url_root: &str) -> Self {
        let root = url_root.trim_end_matches('/');
        let url_base = match source_dir.file_name() {
            Some(name) => format!("{}/{}", root, name.to_string_lossy()),
            None => root.to_string(),
        };
        Self {
            source_dir: source_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            url_base,
        }
    }
}

/// Serializable result of a build, written by `--manifest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySnapshot {
    pub paths: GalleryPaths,
    pub records: Vec<ImageRecord>,
    pub modified: bool,
    pub cancelled: bool,
    pub stats: CacheStats,
    pub messages: Vec<String>,
}

/// State of one gallery directory.
#[derive(Debug)]
pub struct Gallery {
    paths: GalleryPaths,
    config: GalleryConfig,
    records: Vec<ImageRecord>,
    modified: bool,
    cancelled: bool,
    stats: CacheStats,
    messages: Vec<String>,
}

impl Gallery {
    /// A gallery whose derivatives live next to the sources.
    pub fn new(source_dir: &Path, config: GalleryConfig) -> Self {
        Self::with_output_dir(source_dir, source_dir, config)
    }

    pub fn with_output_dir(source_dir: &Path, output_dir: &Path, config: GalleryConfig) -> Self {
        Self {
            paths: GalleryPaths::new(source_dir, output_dir, &config.url_root),
            config,
            records: Vec::new(),
            modified: false,
            cancelled: false,
            stats: CacheStats::default(),
            messages: Vec::new(),
        }
    }

    pub fn paths(&self) -> &GalleryPaths {
        &self.paths
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Records in filename order, placeholders last.
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn record(&self, filename: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    /// Whether this build wrote or deleted anything.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Run one full pass. Per-image failures end up in [`messages`](Self::messages).
    ///
    /// When `cancel` fires, workers stop at their next record. Reaping and
    /// padding still run: the key set comes from the scan, so removing
    /// orphans is safe even when some records were never processed.
    pub fn build(&mut self, cancel: &CancelToken) {
        self.modified = false;
        self.cancelled = false;
        self.stats = CacheStats::default();
        self.messages.clear();

        log::info!("building {}", self.paths.source_dir.display());
        let scan = scan_directory(&self.paths.source_dir, self.config.lower_case_names);
        self.messages.extend(scan.messages);
        self.records = scan.records;

        let ctx = PipelineContext::new(&self.paths.output_dir, &self.paths.url_base, &self.config);
        self.messages.extend(process::prepare_output_dirs(&ctx));

        let report = if self.config.parallel {
            run_parallel(&mut self.records, effective_threads(&self.config), &ctx, cancel)
        } else {
            process::process_records(&mut self.records, &ctx, cancel)
        };
        self.modified |= report.modified;
        self.cancelled = report.cancelled;
        self.stats += report.stats;
        self.messages.extend(report.messages);

        if self.cancelled {
            log::warn!("build of {} cancelled", self.paths.source_dir.display());
            self.messages.push("Build cancelled".to_string());
        }

        self.reap(&ctx);
        self.pad();
        log::info!(
            "built {}: {} records, {}",
            self.paths.source_dir.display(),
            self.records.len(),
            self.stats
        );
    }

    /// Delete derivatives whose source is gone.
    fn reap(&mut self, ctx: &PipelineContext) {
        let keys: HashSet<&str> = self.records.iter().map(|r| r.filename.as_str()).collect();
        for kind in ctx.kinds() {
            let report = remove_orphans(&ctx.artifact_dir(kind), &keys);
            self.modified |= report.modified();
            self.messages.extend(report.messages);
        }
    }

    /// Append placeholders until the record count fills whole rows.
    fn pad(&mut self) {
        let needed = calculate_padding(self.records.len(), self.config.thumbs_per_row);
        let mut index = 0;
        let mut added = 0;
        while added < needed {
            let key = naming::placeholder_key(index);
            if self.record(&key).is_none() {
                self.records
                    .push(ImageRecord::placeholder(key, naming::placeholder_title(index)));
                added += 1;
            }
            index += 1;
        }
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            paths: self.paths.clone(),
            records: self.records.clone(),
            modified: self.modified,
            cancelled: self.cancelled,
            stats: self.stats,
            messages: self.messages.clone(),
        }
    }

    /// Write the snapshot as pretty JSON.
    pub fn write_snapshot(&self, path: &Path) -> Result<(), GalleryError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// One rayon task per partition on a pool of `workers` threads.
///
/// Falls back to running on the calling thread if the pool cannot be built.
fn run_parallel(
    records: &mut [ImageRecord],
    workers: usize,
    ctx: &PipelineContext,
    cancel: &CancelToken,
) -> WorkerReport {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            let mut report = process::process_records(records, ctx, cancel);
            let message = format!("Worker pool unavailable, ran sequentially: {e}");
            log::warn!("{message}");
            report.messages.insert(0, message);
            return report;
        }
    };
    log::debug!("processing {} records on {} workers", records.len(), workers);

    let partitions = partition_mut(records, workers);
    let reports: Vec<WorkerReport> = pool.install(|| {
        partitions
            .into_par_iter()
            .map(|chunk| process::process_records(chunk, ctx, cancel))
            .collect()
    });

    let mut merged = WorkerReport::default();
    for report in reports {
        merged.merge(report);
    }
    merged
}
