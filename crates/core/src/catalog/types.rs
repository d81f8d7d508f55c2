//! Types for the media catalog.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One indexed media folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Folder name; unique within the catalog.
    pub id: String,
    /// Display name (same as the folder name).
    pub name: String,
    /// Locator of the first recognized video file.
    pub video_url: String,
    /// Locator of the first recognized image file.
    pub cover_url: Option<String>,
    /// Tags copied from the folder's tag file.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the folder was scanned.
    pub created_at: DateTime<Utc>,
}

/// Kind of media file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    const VIDEO_EXTENSIONS: [&'static str; 4] = ["mp4", "avi", "mkv", "mov"];
    const IMAGE_EXTENSIONS: [&'static str; 4] = ["jpg", "jpeg", "png", "gif"];

    /// Classify a file name by its extension, ignoring case.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        let ext = ext.to_ascii_lowercase();
        if Self::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if Self::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// Freshness of the persisted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    /// Scanned within the staleness threshold.
    Fresh,
    /// Never scanned by this process, or scanned too long ago.
    Stale,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog index {path}: {source}")]
    IndexParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode catalog index {path}: {source}")]
    IndexEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Tag is required")]
    TagRequired,

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Failed to write tag file {0}")]
    TagWriteFailed(PathBuf),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
