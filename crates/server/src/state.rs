use std::sync::Arc;

use convertiverse_core::{ArtifactStore, Config, Dispatcher, Resolver};

/// Shared application state
pub struct AppState {
    config: Config,
    resolver: Arc<Resolver>,
    dispatcher: Arc<Dispatcher>,
    store: Arc<ArtifactStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        resolver: Arc<Resolver>,
        dispatcher: Arc<Dispatcher>,
        store: Arc<ArtifactStore>,
    ) -> Self {
        Self {
            config,
            resolver,
            dispatcher,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}
