use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub library: LibraryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built web client, served with an index.html fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    3001
}

/// Media library configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Root directory; every immediate subdirectory is one video folder.
    pub media_root: PathBuf,
    /// JSON file holding the persisted catalog.
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
    /// Prefix prepended to media locators (e.g. "http://localhost:3001").
    /// Locators are host-relative when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    /// Sort folder and file listings by name instead of using the
    /// filesystem's listing order.
    #[serde(default)]
    pub sort_entries: bool,
    /// Name of the per-folder tag file.
    #[serde(default = "default_tag_file")]
    pub tag_file: String,
    /// What to do when a tag file cannot be written.
    #[serde(default)]
    pub on_tag_write_failure: TagWritePolicy,
}

impl LibraryConfig {
    /// Library config with defaults for everything but the media root.
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            index_path: default_index_path(),
            public_base_url: None,
            sort_entries: false,
            tag_file: default_tag_file(),
            on_tag_write_failure: TagWritePolicy::default(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

fn default_tag_file() -> String {
    "tags.txt".to_string()
}

/// Behavior when writing a folder's tag file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagWritePolicy {
    /// Log the failure and still patch the index, so the index may
    /// disagree with the tag file until the next full rescan.
    #[default]
    Proceed,
    /// Fail the request and leave the index and search cache untouched.
    Fail,
}

/// Cache timing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Age after which a read may trigger a filesystem rescan.
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,
    /// Lifetime of a cached search result.
    #[serde(default = "default_search_ttl_secs")]
    pub search_ttl_secs: u64,
    /// Upper bound for the `limit` query parameter.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl CacheConfig {
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            staleness_secs: default_staleness_secs(),
            search_ttl_secs: default_search_ttl_secs(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_staleness_secs() -> u64 {
    3600
}

fn default_search_ttl_secs() -> u64 {
    300
}

fn default_max_page_size() -> u32 {
    500
}
