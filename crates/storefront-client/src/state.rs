//! Top-level storefront handle.
//!
//! Wires the state store, API client, and flows together so a host
//! constructs one value and hands clones to its views.

use std::sync::Arc;

use clove_core::Session;

use crate::api::ApiClient;
use crate::cart::CartManager;
use crate::catalog::Catalog;
use crate::checkout::Checkout;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::search::SearchFlow;
use crate::store::{FileStorage, StateStore, StorageBackend, StoreError};

/// The assembled storefront client.
///
/// Cheaply cloneable via `Arc`; all clones share the same store, HTTP
/// connection pool, and catalog view state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    store: Arc<StateStore>,
    api: ApiClient,
    catalog: Catalog,
}

impl Storefront {
    /// Open a storefront with file-backed persistence under the configured
    /// state directory.
    ///
    /// Rehydrates the session and cart slices; a rehydrated login arms the
    /// Authorization cell before the first request goes out.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let backend = FileStorage::open(&config.state_dir)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Open a storefront over an explicit storage backend.
    #[must_use]
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn StorageBackend>) -> Self {
        let store = Arc::new(StateStore::open(backend));
        let api = ApiClient::new(&config, store.auth().clone());
        let catalog = Catalog::new(api.clone());

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                store,
                api,
                catalog,
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the state store.
    #[must_use]
    pub fn store(&self) -> &Arc<StateStore> {
        &self.inner.store
    }

    /// Get a reference to the commerce API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the product listing state machine.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Cart operations bound to this storefront's store.
    #[must_use]
    pub fn cart(&self) -> CartManager {
        CartManager::new(Arc::clone(&self.inner.store))
    }

    /// Search flow bound to this storefront.
    #[must_use]
    pub fn search(&self) -> SearchFlow {
        SearchFlow::new(self.inner.api.clone(), Arc::clone(&self.inner.store))
    }

    /// Checkout flow bound to this storefront.
    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.inner.api.clone(), Arc::clone(&self.inner.store))
    }

    /// Record a successful login: persist the session and arm the
    /// Authorization cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn login(&self, session: Session) -> std::result::Result<(), StoreError> {
        self.inner.store.write_session(session)
    }

    /// Log out: reset the session slice and disarm the Authorization cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset session cannot be persisted.
    pub fn logout(&self) -> std::result::Result<(), StoreError> {
        self.inner.store.write_session(Session::anonymous())
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("api", &self.inner.api)
            .field("store", &self.inner.store)
            .finish()
    }
}
