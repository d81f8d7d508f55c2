//! In-memory search result cache.
//!
//! Results are keyed by the normalized search term and served verbatim until
//! they expire, even if the catalog changed meanwhile. Tag mutations clear
//! the whole cache since any entry's membership may have changed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::catalog::CatalogEntry;
use crate::metrics::{SEARCH_CACHE_INVALIDATIONS, SEARCH_CACHE_LOOKUPS};

/// A memoized search result.
#[derive(Debug, Clone)]
struct CachedSearch {
    results: Vec<CatalogEntry>,
    stored_at: Instant,
}

/// Search result cache with time-based expiry.
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedSearch>>,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Entries of `catalog` whose name or any tag contains `term`, ignoring case.
    ///
    /// An empty term returns the whole catalog and bypasses the cache.
    pub fn search(&self, catalog: &[CatalogEntry], term: &str) -> Vec<CatalogEntry> {
        let key = normalize(term);
        if key.is_empty() {
            return catalog.to_vec();
        }

        let mut entries = self.entries.lock().unwrap();
        if let Some(cached) = entries.get(&key) {
            if cached.stored_at.elapsed() < self.ttl {
                SEARCH_CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                return cached.results.clone();
            }
            entries.remove(&key);
            SEARCH_CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
        } else {
            SEARCH_CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
        }

        let results: Vec<CatalogEntry> = catalog
            .iter()
            .filter(|entry| matches(entry, &key))
            .cloned()
            .collect();
        entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CachedSearch {
                results: results.clone(),
                stored_at: Instant::now(),
            },
        );
        results
    }

    /// Drop every cached result.
    pub fn invalidate_all(&self) {
        self.entries.lock().unwrap().clear();
        SEARCH_CACHE_INVALIDATIONS.inc();
    }

    /// Number of cached terms that have not expired.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lowercased term with surrounding whitespace removed, so `"cat "` and
/// `"Cat"` share one cache entry and match the same videos.
fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

fn matches(entry: &CatalogEntry, term: &str) -> bool {
    entry.name.to_lowercase().contains(term)
        || entry.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}
