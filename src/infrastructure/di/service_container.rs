//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{type_tree_url, CedClient, TypeTree};
use crate::config::Settings;
use crate::infrastructure::traits::{Fetcher, HttpFetcher};

/// Container holding settings and the shared fetcher.
///
/// Services are cheap to build and are created on demand.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// HTTP abstraction
    pub fetcher: Arc<dyn Fetcher>,
}

impl ServiceContainer {
    /// Create a new service container with the real HTTP fetcher.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(HttpFetcher))
    }

    /// Create a service container with a custom fetcher (for testing).
    pub fn with_deps(settings: Settings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            settings: Arc::new(settings),
            fetcher,
        }
    }

    /// Inventory client for the configured catalog and workspace.
    pub fn ced_client(&self) -> CedClient {
        CedClient::new(Arc::clone(&self.fetcher), &self.settings)
    }

    /// Unpopulated type hierarchy for the configured server.
    pub fn type_tree(&self) -> TypeTree {
        TypeTree::new(
            Arc::clone(&self.fetcher),
            type_tree_url(&self.settings.base_url()),
            self.settings.verify,
        )
    }
}
