//! Record types shared by the scanner, the pipeline and the gallery.
//!
//! Records are serialized into the gallery snapshot, so everything here
//! derives `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The three derivative tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Preview,
    Thumbnail,
    Feed,
}

impl ArtifactKind {
    /// Name of the output subdirectory (and URL segment) for this tier.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Preview => "previews",
            ArtifactKind::Thumbnail => "thumbnails",
            ArtifactKind::Feed => "feed",
        }
    }
}

/// A derived file (or, for a pass-through preview, the original itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// One image of the gallery, keyed by filename.
///
/// Placeholders appended for grid padding have `source == None` and never
/// reach the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    pub source: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub exif_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ImageRecord {
    /// A real record backed by a source file.
    pub fn new(filename: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// A padding placeholder with no backing file.
    pub fn placeholder(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            filename: key.into(),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source.is_none()
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        match kind {
            ArtifactKind::Preview => self.preview.as_ref(),
            ArtifactKind::Thumbnail => self.thumbnail.as_ref(),
            ArtifactKind::Feed => self.feed.as_ref(),
        }
    }

    pub(crate) fn set_artifact(&mut self, kind: ArtifactKind, artifact: Artifact) {
        match kind {
            ArtifactKind::Preview => self.preview = Some(artifact),
            ArtifactKind::Thumbnail => self.thumbnail = Some(artifact),
            ArtifactKind::Feed => self.feed = Some(artifact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_no_source() {
        let blank = ImageRecord::placeholder("blank0.jpg", "blank0");
        assert!(blank.is_placeholder());
        assert_eq!(blank.title.as_deref(), Some("blank0"));
    }

    #[test]
    fn real_record_is_not_placeholder() {
        let rec = ImageRecord::new("a.jpg", "/photos/a.jpg");
        assert!(!rec.is_placeholder());
        assert_eq!(rec.source, Some(PathBuf::from("/photos/a.jpg")));
    }

    #[test]
    fn set_artifact_targets_the_right_tier() {
        let mut rec = ImageRecord::new("a.jpg", "/photos/a.jpg");
        let art = Artifact {
            path: "/photos/feed/a.jpg".into(),
            url: "/images/photos/feed/a.jpg".into(),
            width: 72,
            height: 72,
        };
        rec.set_artifact(ArtifactKind::Feed, art.clone());
        assert_eq!(rec.artifact(ArtifactKind::Feed), Some(&art));
        assert!(rec.preview.is_none());
        assert!(rec.thumbnail.is_none());
    }

    #[test]
    fn dir_names() {
        assert_eq!(ArtifactKind::Preview.dir_name(), "previews");
        assert_eq!(ArtifactKind::Thumbnail.dir_name(), "thumbnails");
        assert_eq!(ArtifactKind::Feed.dir_name(), "feed");
    }

    #[test]
    fn snapshot_json_omits_empty_artifacts() {
        let rec = ImageRecord::new("a.jpg", "/photos/a.jpg");
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("preview"));
        assert!(json.contains("\"filename\":\"a.jpg\""));
    }
}
