use std::sync::Arc;

use popcorn_core::{Config, MovieCatalog, SanitizedConfig, WatchedList};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn MovieCatalog>,
    watched: Arc<WatchedList>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn MovieCatalog>, watched: Arc<WatchedList>) -> Self {
        Self {
            config,
            catalog,
            watched,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> Arc<dyn MovieCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }
}
