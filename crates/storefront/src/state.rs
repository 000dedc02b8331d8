//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cart::{CartStore, FileStore, KeyValueStore};
use crate::catalog::{CatalogClient, CatalogState};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart and catalog state
/// sit behind `std::sync::Mutex`; guards must never be held across an
/// `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: Mutex<CartStore>,
    catalog_state: Mutex<CatalogState>,
}

impl AppState {
    /// Create application state backed by a file store in `config.data_dir`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create application state around an explicit key-value store.
    ///
    /// The cart is loaded from `storage` immediately.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let cart = CartStore::load(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
                catalog_state: Mutex::new(CatalogState::new()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Lock the cart store.
    pub fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The catalog view state, for use with [`crate::catalog::state`] helpers.
    #[must_use]
    pub fn catalog_state(&self) -> &Mutex<CatalogState> {
        &self.inner.catalog_state
    }

    /// Lock the catalog view state.
    pub fn lock_catalog_state(&self) -> MutexGuard<'_, CatalogState> {
        self.inner
            .catalog_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
