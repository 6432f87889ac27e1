use std::sync::Arc;

use hasher_core::{Config, HashService};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<HashService>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<HashService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &HashService {
        self.service.as_ref()
    }
}
