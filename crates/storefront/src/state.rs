//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart_store::CartStore;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::page::{PageController, PageRegistry};
use crate::storage::{FileStorage, LocalStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart store, the page controller and the registry of loaded pages.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: CartStore,
    controller: PageController,
    pages: PageRegistry,
}

impl AppState {
    /// Create application state persisting the cart at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStorage::new(&config.storage_path));
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, CatalogError> {
        let store = CartStore::new(storage);
        let catalog = CatalogClient::new(&config.catalog)?;
        let controller = PageController::new(store.clone(), catalog);
        let pages = PageRegistry::new(&config.pages);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                controller,
                pages,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.inner.store
    }

    /// Get a reference to the page controller.
    #[must_use]
    pub fn controller(&self) -> &PageController {
        &self.inner.controller
    }

    /// Get a reference to the loaded page registry.
    #[must_use]
    pub fn pages(&self) -> &PageRegistry {
        &self.inner.pages
    }
}
