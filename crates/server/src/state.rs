use std::sync::Arc;

use catapi_core::{Authenticator, CatService, CatStore, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    cats: Arc<dyn CatService>,
    store: Arc<dyn CatStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        cats: Arc<dyn CatService>,
        store: Arc<dyn CatStore>,
    ) -> Self {
        Self {
            config,
            authenticator,
            cats,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn cats(&self) -> &dyn CatService {
        self.cats.as_ref()
    }

    /// Number of stored cats, for the metrics gauge.
    pub fn stored_cats(&self) -> Option<usize> {
        self.store.count().ok()
    }
}
