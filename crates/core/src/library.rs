//! The media library service.
//!
//! [`Library`] owns the catalog index, the search cache and the tag store,
//! and serializes every index read-modify-write and cache mutation behind a
//! single lock. Request handlers share one instance.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{
    CatalogEntry, CatalogError, CatalogIndex, FolderScanner, Staleness, TagStore,
};
use crate::config::{CacheConfig, LibraryConfig, TagWritePolicy};
use crate::pagination::{paginate, Page, PageRequest};
use crate::search::SearchCache;

/// Snapshot of the library state.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    pub video_count: usize,
    pub cached_searches: usize,
    pub index: Staleness,
}

/// Tag list edit applied by [`Library::add_tag`] and [`Library::remove_tag`].
enum TagEdit<'a> {
    Add(&'a str),
    Remove(&'a str),
}

impl TagEdit<'_> {
    /// Apply the edit; returns true if `tags` changed.
    fn apply(&self, tags: &mut Vec<String>) -> bool {
        match self {
            TagEdit::Add(tag) => {
                if tags.iter().any(|t| t == tag) {
                    return false;
                }
                tags.push(tag.to_string());
                true
            }
            TagEdit::Remove(tag) => {
                let before = tags.len();
                tags.retain(|t| t != tag);
                tags.len() != before
            }
        }
    }
}

pub struct Library {
    index: CatalogIndex,
    search: SearchCache,
    write_policy: TagWritePolicy,
    max_page_size: u32,
    guard: Mutex<()>,
}

impl Library {
    /// Open the library, creating the media root and an empty index if missing.
    pub fn open(library: &LibraryConfig, cache: &CacheConfig) -> Result<Self, CatalogError> {
        let media_root = &library.media_root;
        if !media_root.exists() {
            info!("Creating media root {}", media_root.display());
            std::fs::create_dir_all(media_root).map_err(|e| CatalogError::io(media_root, e))?;
        }

        let scanner = FolderScanner::new(media_root, TagStore::new(&library.tag_file))
            .with_base_url(library.public_base_url.as_deref())
            .with_sorted_entries(library.sort_entries);
        let index = CatalogIndex::new(&library.index_path, scanner, cache.staleness());
        index.ensure_initialized()?;

        Ok(Self {
            index,
            search: SearchCache::new(cache.search_ttl()),
            write_policy: library.on_tag_write_failure,
            max_page_size: cache.max_page_size,
            guard: Mutex::new(()),
        })
    }

    pub fn media_root(&self) -> &Path {
        self.index.scanner().media_root()
    }

    /// One page of the full catalog.
    pub fn list(&self, page: PageRequest) -> Result<Page<CatalogEntry>, CatalogError> {
        let _guard = self.guard.lock().unwrap();
        let entries = self.index.get_or_scan()?;
        Ok(paginate(entries, page.clamped(self.max_page_size)))
    }

    /// One page of the entries matching `term`.
    pub fn search(
        &self,
        term: &str,
        page: PageRequest,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        let _guard = self.guard.lock().unwrap();
        let entries = self.index.get_or_scan()?;
        let results = self.search.search(&entries, term);
        Ok(paginate(results, page.clamped(self.max_page_size)))
    }

    /// Force a full rescan; returns the number of indexed videos.
    pub fn rescan(&self) -> Result<usize, CatalogError> {
        let _guard = self.guard.lock().unwrap();
        Ok(self.index.rescan(true)?.len())
    }

    /// Look up an entry in the persisted index (no scan is triggered).
    pub fn get(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        let _guard = self.guard.lock().unwrap();
        self.index
            .load_persisted()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Add `tag` to a video unless it already has it.
    pub fn add_tag(&self, id: &str, tag: &str) -> Result<CatalogEntry, CatalogError> {
        let tag = validate_tag(tag)?;
        self.edit_tags(id, TagEdit::Add(tag))
    }

    /// Remove every occurrence of `tag` from a video.
    pub fn remove_tag(&self, id: &str, tag: &str) -> Result<CatalogEntry, CatalogError> {
        self.edit_tags(id, TagEdit::Remove(tag))
    }

    pub fn stats(&self) -> Result<LibraryStats, CatalogError> {
        let _guard = self.guard.lock().unwrap();
        Ok(LibraryStats {
            video_count: self.index.load_persisted()?.len(),
            cached_searches: self.search.len(),
            index: self.index.staleness(),
        })
    }

    fn edit_tags(&self, id: &str, edit: TagEdit<'_>) -> Result<CatalogEntry, CatalogError> {
        let folder = self.folder_path(id)?;
        let tag_store = self.index.scanner().tag_store();

        let _guard = self.guard.lock().unwrap();
        let mut tags = tag_store.read_tags(&folder);
        if edit.apply(&mut tags) && !tag_store.write_tags(&folder, &tags) {
            match self.write_policy {
                TagWritePolicy::Fail => {
                    return Err(CatalogError::TagWriteFailed(tag_store.tag_file(&folder)));
                }
                TagWritePolicy::Proceed => {
                    warn!("Tag file for {} not written, updating index anyway", id);
                }
            }
        }

        let updated = self.index.update_tags(id, tags)?;
        self.search.invalidate_all();
        updated.ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Existing folder for `id`; ids must be a single plain path component.
    fn folder_path(&self, id: &str) -> Result<PathBuf, CatalogError> {
        let mut components = Path::new(id).components();
        let is_plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(name)), None) if name == id
        );
        let folder = self.media_root().join(id);
        if !is_plain || !folder.is_dir() {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        Ok(folder)
    }
}

/// Trimmed tag, rejecting empty tags and line breaks (the tag file is
/// newline-delimited).
fn validate_tag(tag: &str) -> Result<&str, CatalogError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(CatalogError::TagRequired);
    }
    if tag.contains(['\n', '\r']) {
        return Err(CatalogError::InvalidTag(tag.to_string()));
    }
    Ok(tag)
}
