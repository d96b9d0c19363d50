//! Gallery configuration.
//!
//! Stock defaults are overridden by an optional `lazygal.toml` in the source
//! directory (or a file passed with `--config`). The file is sparse: it only
//! needs the keys it wants to change.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! thumbs_per_row = 6        # Grid width; the gallery is padded to a multiple of it
//! rotate = false            # Fix EXIF orientation in place before generating
//! feed = false              # Also generate feed thumbnails
//! parallel = false          # Split the work across a worker pool
//! lower_case_names = false  # Rename source files to lower case before scanning
//! url_root = "/images"      # Prefix for every generated URL
//! # max_processes = 4       # Cap on parallel workers (omit for = CPU cores)
//!
//! [preview]
//! width = 800
//! height = 600
//!
//! [thumbnail]
//! width = 120
//! height = 120
//!
//! [feed_thumbnail]
//! width = 72
//! height = 72
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source directory.
pub const CONFIG_FILENAME: &str = "lazygal.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A bounding box in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
}

impl BoxSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Everything a gallery run needs besides the source directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Box the preview is scaled down into, preserving aspect ratio.
    pub preview: BoxSize,
    /// Exact size of the square-cropped thumbnail.
    pub thumbnail: BoxSize,
    /// Exact size of the square-cropped feed thumbnail.
    pub feed_thumbnail: BoxSize,
    /// Display grid width. The record list is padded to a multiple of it.
    pub thumbs_per_row: usize,
    /// Correct EXIF orientation of jpeg sources in place.
    pub rotate: bool,
    /// Generate feed thumbnails.
    pub feed: bool,
    /// Run the pipeline on a worker pool.
    pub parallel: bool,
    /// Rename sources to lower case before scanning.
    pub lower_case_names: bool,
    /// URL prefix; the source directory name is appended to it.
    pub url_root: String,
    /// Maximum number of workers in parallel mode.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            preview: BoxSize::new(800, 600),
            thumbnail: BoxSize::new(120, 120),
            feed_thumbnail: BoxSize::new(72, 72),
            thumbs_per_row: 6,
            rotate: false,
            feed: false,
            parallel: false,
            lower_case_names: false,
            url_root: "/images".to_string(),
            max_processes: None,
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("preview", self.preview),
            ("thumbnail", self.thumbnail),
            ("feed_thumbnail", self.feed_thumbnail),
        ] {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} width and height must be non-zero"
                )));
            }
        }
        if self.thumbs_per_row == 0 {
            return Err(ConfigError::Validation(
                "thumbs_per_row must be at least 1".into(),
            ));
        }
        if self.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &GalleryConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `lazygal.toml` in the given directory, falling back to
/// stock defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(load_raw_config(&dir.join(CONFIG_FILENAME))?)
}

/// Load config from an explicit file path. The file must exist.
pub fn load_config_file(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `lazygal.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# lazygal configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Place this file as lazygal.toml in the image directory, or pass it
# with --config. Unknown keys will cause an error.

# Number of thumbnails per grid row. The record list is padded with
# placeholders so its length is a multiple of this value.
thumbs_per_row = 6

# Rewrite jpeg sources whose EXIF orientation is 3, 6 or 8 so they are
# stored upright. This modifies the source files.
rotate = false

# Also generate small thumbnails for syndication feeds (feed/ directory).
feed = false

# Split the images across a pool of workers, one contiguous chunk each.
parallel = false

# Rename source files to lower case before scanning.
lower_case_names = false

# Prefix of every generated URL. The image directory name is appended.
url_root = "/images"

# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Derivative sizes
# ---------------------------------------------------------------------------

# Previews are scaled down to fit this box. Smaller images are used as-is.
[preview]
width = 800
height = 600

# Thumbnails are cropped to a centered square, then scaled to this size.
[thumbnail]
width = 120
height = 120

# Feed thumbnails use the same crop at this size.
[feed_thumbnail]
width = 72
height = 72
"##
}
