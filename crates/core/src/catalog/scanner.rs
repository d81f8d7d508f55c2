//! Derives a catalog entry from a single media folder.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use super::{CatalogEntry, CatalogError, MediaKind, TagStore};

/// URL path prefix under which the media root is served.
pub const MEDIA_ROUTE: &str = "/videos";

/// Inspects folders under the media root.
#[derive(Debug, Clone)]
pub struct FolderScanner {
    media_root: PathBuf,
    base_url: String,
    sort_entries: bool,
    tags: TagStore,
}

impl FolderScanner {
    pub fn new(media_root: impl Into<PathBuf>, tags: TagStore) -> Self {
        Self {
            media_root: media_root.into(),
            base_url: String::new(),
            sort_entries: false,
            tags,
        }
    }

    /// Prefix locators with a public base URL (trailing slashes are dropped).
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        self.base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default();
        self
    }

    /// Sort listings by name instead of using filesystem order.
    pub fn with_sorted_entries(mut self, sort_entries: bool) -> Self {
        self.sort_entries = sort_entries;
        self
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn tag_store(&self) -> &TagStore {
        &self.tags
    }

    /// Names of the immediate subdirectories of the media root.
    pub fn list_folders(&self) -> Result<Vec<String>, CatalogError> {
        self.list(&self.media_root, |file_type| file_type.is_dir())
    }

    /// Build the catalog entry for `folder_name`.
    ///
    /// Returns `Ok(None)` when the folder holds no recognized video file.
    pub fn scan_folder(&self, folder_name: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let folder = self.media_root.join(folder_name);
        let files = self.list(&folder, |file_type| file_type.is_file())?;

        let first_of = |kind: MediaKind| {
            files
                .iter()
                .find(|name| MediaKind::from_file_name(name) == Some(kind))
        };

        let Some(video) = first_of(MediaKind::Video) else {
            debug!("Skipping {}: no video file", folder.display());
            return Ok(None);
        };
        let cover = first_of(MediaKind::Image);

        Ok(Some(CatalogEntry {
            id: folder_name.to_string(),
            name: folder_name.to_string(),
            video_url: self.locator(folder_name, video),
            cover_url: cover.map(|file| self.locator(folder_name, file)),
            tags: self.tags.read_tags(&folder),
            created_at: Utc::now(),
        }))
    }

    /// Public URL of `file` inside `folder`.
    pub fn locator(&self, folder: &str, file: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url,
            MEDIA_ROUTE,
            urlencoding::encode(folder),
            urlencoding::encode(file)
        )
    }

    /// Names of entries in `dir` accepted by `keep`, in listing order
    /// (or sorted when configured). Entries with non-UTF-8 names are skipped.
    fn list(
        &self,
        dir: &Path,
        keep: impl Fn(&fs::FileType) -> bool,
    ) -> Result<Vec<String>, CatalogError> {
        let read_dir = fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
            // Follow symlinks so linked folders and files still count.
            let file_type = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata.file_type(),
                Err(e) => {
                    debug!("Ignoring {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !keep(&file_type) {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => debug!("Ignoring non UTF-8 name {:?}", name),
            }
        }

        if self.sort_entries {
            names.sort();
        }
        Ok(names)
    }
}
