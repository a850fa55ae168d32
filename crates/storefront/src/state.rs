//! Application state shared across commands.

use std::sync::Arc;

use crate::catalog::CachedCatalog;
use crate::config::StorefrontConfig;
use crate::services::{CartManager, SessionService};
use crate::store::FileStore;

/// Application state: the long-lived catalog and store built from configuration.
///
/// This struct is cheaply cloneable via `Arc`; the catalog cache is shared by
/// every clone, so the catalog is fetched at most once per process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CachedCatalog,
    store: FileStore,
}

impl AppState {
    /// Create a new application state. Nothing is loaded until first use.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: CachedCatalog::new(config.catalog),
                store: FileStore::new(config.store_path),
            }),
        }
    }

    /// Get a reference to the cached catalog.
    #[must_use]
    pub fn catalog(&self) -> &CachedCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the local store.
    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.inner.store
    }

    /// A cart manager over the shared catalog and store.
    #[must_use]
    pub fn cart(&self) -> CartManager<&CachedCatalog, &FileStore> {
        CartManager::new(&self.inner.catalog, &self.inner.store)
    }

    /// A session service over the shared store.
    #[must_use]
    pub fn sessions(&self) -> SessionService<&FileStore> {
        SessionService::new(&self.inner.store)
    }
}
