//! JSON-file catalog index (a materialized view of the media root).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use super::{CatalogEntry, CatalogError, FolderScanner, Staleness};
use crate::metrics::{FOLDERS_SKIPPED, SCANS_TOTAL, SCAN_DURATION};

/// Catalog persisted as a pretty-printed JSON array.
///
/// The index is rebuilt wholesale by [`CatalogIndex::rescan`] and patched in
/// place by [`CatalogIndex::update_tags`]. Non-forced rescans are skipped
/// while the last successful scan is younger than the staleness threshold.
pub struct CatalogIndex {
    path: PathBuf,
    scanner: FolderScanner,
    staleness_threshold: Duration,
    last_scan: Mutex<Option<Instant>>,
}

impl CatalogIndex {
    pub fn new(
        path: impl Into<PathBuf>,
        scanner: FolderScanner,
        staleness_threshold: Duration,
    ) -> Self {
        Self {
            path: path.into(),
            scanner,
            staleness_threshold,
            last_scan: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scanner(&self) -> &FolderScanner {
        &self.scanner
    }

    /// Create an empty index file (and its parent directory) if none exists.
    pub fn ensure_initialized(&self) -> Result<(), CatalogError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        info!("Initializing empty catalog index at {}", self.path.display());
        self.persist(&[])
    }

    /// Read the persisted catalog. A missing file reads as empty.
    pub fn load_persisted(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::io(&self.path, e)),
        };
        serde_json::from_str(&content).map_err(|source| CatalogError::IndexParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the index file with `entries`.
    pub fn persist(&self, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| {
            CatalogError::IndexEncode {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|e| CatalogError::io(&self.path, e))
    }

    /// Whether a non-forced rescan would walk the filesystem.
    pub fn staleness(&self) -> Staleness {
        let last_scan = *self.last_scan.lock().unwrap();
        match last_scan {
            Some(at) if at.elapsed() < self.staleness_threshold => Staleness::Fresh,
            _ => Staleness::Stale,
        }
    }

    /// Rebuild the catalog from the media root.
    ///
    /// Without `force`, a fresh index is returned as persisted and the
    /// filesystem is not touched.
    pub fn rescan(&self, force: bool) -> Result<Vec<CatalogEntry>, CatalogError> {
        if !force && self.staleness() == Staleness::Fresh {
            return self.load_persisted();
        }

        let trigger = if force { "forced" } else { "stale" };
        info!("Scanning videos in {} ({})", self.scanner.media_root().display(), trigger);
        let started = Instant::now();

        let folders = self.scanner.list_folders()?;
        let mut entries = Vec::with_capacity(folders.len());
        for folder in &folders {
            match self.scanner.scan_folder(folder)? {
                Some(entry) => entries.push(entry),
                None => FOLDERS_SKIPPED.inc(),
            }
        }

        self.persist(&entries)?;
        *self.last_scan.lock().unwrap() = Some(Instant::now());

        let elapsed = started.elapsed();
        SCANS_TOTAL.with_label_values(&[trigger]).inc();
        SCAN_DURATION.observe(elapsed.as_secs_f64());
        info!(
            "Video scan completed in {}ms. Found {} videos in {} folders.",
            elapsed.as_millis(),
            entries.len(),
            folders.len()
        );

        Ok(entries)
    }

    /// Persisted catalog, bootstrapped with a non-forced rescan when empty.
    pub fn get_or_scan(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let entries = self.load_persisted()?;
        if entries.is_empty() {
            return self.rescan(false);
        }
        Ok(entries)
    }

    /// Replace the tags of entry `id` and persist the index.
    ///
    /// Returns `None` without writing anything when `id` is not indexed.
    pub fn update_tags(
        &self,
        id: &str,
        tags: Vec<String>,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let mut entries = self.load_persisted()?;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Ok(None);
        };
        entry.tags = tags;
        let updated = entry.clone();
        self.persist(&entries)?;
        Ok(Some(updated))
    }
}
