//! Media catalog - a JSON index of the video folders under the media root.
//!
//! Each immediate subdirectory of the media root with at least one
//! recognized video file becomes one [`CatalogEntry`]. The index file is a
//! cache of the filesystem and of the per-folder tag files.

mod index;
mod scanner;
mod tags;
mod types;

pub use index::CatalogIndex;
pub use scanner::{FolderScanner, MEDIA_ROUTE};
pub use tags::TagStore;
pub use types::*;
