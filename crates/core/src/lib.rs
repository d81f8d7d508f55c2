pub mod catalog;
pub mod config;
pub mod library;
pub mod metrics;
pub mod pagination;
pub mod search;

pub use catalog::{
    CatalogEntry, CatalogError, CatalogIndex, FolderScanner, MediaKind, Staleness, TagStore,
    MEDIA_ROUTE,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    LibraryConfig, ServerConfig, TagWritePolicy,
};
pub use library::{Library, LibraryStats};
pub use pagination::{paginate, Page, PageRequest, Pagination};
pub use search::SearchCache;
