//! Presence-on-disk cache for derived images.
//!
//! A derivative is regenerated only when its file is missing. There is no
//! manifest and no content hashing: the output tree itself is the cache.
//! Changing a source in place therefore does not refresh its derivatives;
//! delete them (or the whole `previews/`, `thumbnails/`, `feed/` directory)
//! to force a rebuild.
//!
//! ## Layout
//!
//! ```text
//! <out>/previews/<filename>          scaled preview (absent when the source fits)
//! <out>/previews/<filename>.exif     EXIF dump sidecar
//! <out>/previews/<filename>.noexif   empty "no EXIF" marker
//! <out>/thumbnails/<filename>        square thumbnail
//! <out>/feed/<filename>              square feed thumbnail
//! ```

use crate::types::ArtifactKind;
use std::fmt;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

/// Directory holding the derivatives of one tier.
pub fn artifact_dir(output_dir: &Path, kind: ArtifactKind) -> PathBuf {
    output_dir.join(kind.dir_name())
}

/// Deterministic path of a derivative.
pub fn artifact_path(output_dir: &Path, kind: ArtifactKind, filename: &str) -> PathBuf {
    artifact_dir(output_dir, kind).join(filename)
}

/// The cached file at `path`, if it is present.
pub fn lookup(path: &Path) -> Option<&Path> {
    path.is_file().then_some(path)
}

/// Summary of cache behavior for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Derivative already on disk.
    pub hits: u32,
    /// Preview skipped because the source fits the box.
    pub passthrough: u32,
    /// Derivative decoded, scaled and written this run.
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn pass(&mut self) {
        self.passthrough += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.passthrough + self.misses
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, other: Self) {
        self.hits += other.hits;
        self.passthrough += other.passthrough;
        self.misses += other.misses;
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits == 0 && self.passthrough == 0 {
            return write!(f, "{} encoded", self.misses);
        }
        if self.passthrough > 0 {
            write!(
                f,
                "{} cached, {} passed through, {} encoded ({} total)",
                self.hits,
                self.passthrough,
                self.misses,
                self.total()
            )
        } else {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        }
    }
}
