use std::sync::Arc;
use vidshelf_core::{Config, Library};

/// Shared application state
pub struct AppState {
    config: Config,
    library: Arc<Library>,
}

impl AppState {
    pub fn new(config: Config, library: Arc<Library>) -> Self {
        Self { config, library }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &Library {
        self.library.as_ref()
    }
}
