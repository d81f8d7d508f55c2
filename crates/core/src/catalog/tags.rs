//! Per-folder tag files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::metrics::TAG_WRITE_FAILURES;

/// Reads and writes the newline-separated tag file kept in each media folder.
///
/// The tag file is the source of truth for a folder's tags; the catalog index
/// only holds a copy.
#[derive(Debug, Clone)]
pub struct TagStore {
    file_name: String,
}

impl TagStore {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the tag file inside `folder`.
    pub fn tag_file(&self, folder: &Path) -> PathBuf {
        folder.join(&self.file_name)
    }

    /// Read a folder's tags.
    ///
    /// Lines are trimmed and empty lines dropped. A missing file yields no
    /// tags; any other read error is logged and also yields no tags.
    pub fn read_tags(&self, folder: &Path) -> Vec<String> {
        let path = self.tag_file(folder);
        match fs::read_to_string(&path) {
            Ok(content) => parse_tags(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Error reading tags from {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Overwrite a folder's tag file. Returns false (after logging) on failure.
    #[must_use]
    pub fn write_tags(&self, folder: &Path, tags: &[String]) -> bool {
        let path = self.tag_file(folder);
        match fs::write(&path, tags.join("\n")) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving tags to {}: {}", path.display(), e);
                TAG_WRITE_FAILURES.inc();
                false
            }
        }
    }
}

fn parse_tags(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
