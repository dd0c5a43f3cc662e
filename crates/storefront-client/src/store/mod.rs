//! Persistent client state store.
//!
//! Three independent slices survive between uses of the storefront:
//!
//! - **session** - who is logged in, persisted under [`keys::AUTH`]
//! - **cart** - product snapshots added to the cart, persisted under
//!   [`keys::CART`]
//! - **search** - the last keyword and its results, memory-only
//!
//! Persisted slices are rehydrated exactly once when the store opens; a
//! malformed blob is discarded in favor of the slice default rather than
//! crash rehydration. Writes replace the whole slice: serialize, store,
//! then swap the in-memory value, so a failed storage write leaves both the
//! persisted and in-memory state at their previous value and the error
//! propagates to the caller.
//!
//! The session slice has one side effect: writing it re-arms (or disarms)
//! the process-wide Authorization cell in the same call, with no window
//! where the token and the header value disagree.

pub mod auth;
pub mod backend;

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use clove_core::{CartEntry, Product, Session};

pub use auth::AuthCell;
pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError};

/// Fixed storage keys for the persisted slices.
///
/// These two keys are the whole persisted contract; no other keys are
/// written.
pub mod keys {
    /// Key for the persisted authentication session.
    pub const AUTH: &str = "auth";

    /// Key for the persisted cart contents.
    pub const CART: &str = "cart";
}

/// Errors raised by store writes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to persist the slice.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The slice value could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A slice lock was poisoned by a panicking writer.
    #[error("state lock poisoned")]
    LockPoisoned,
}

/// The transient search slice: last keyword and its results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// The keyword as submitted.
    pub keyword: String,
    /// Products matching the keyword.
    pub results: Vec<Product>,
}

/// The client state store.
///
/// Slices are independent: each has its own lock and its own storage key,
/// and no operation ever holds two slice locks at once.
pub struct StateStore {
    backend: Arc<dyn StorageBackend>,
    session: RwLock<Session>,
    cart: RwLock<Vec<CartEntry>>,
    search: RwLock<SearchState>,
    auth: AuthCell,
}

impl StateStore {
    /// Open the store over `backend`, rehydrating persisted slices.
    ///
    /// A non-empty rehydrated session token arms the Authorization cell, so
    /// a returning user's requests authenticate without a fresh login.
    #[must_use]
    pub fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let session: Session = rehydrate(backend.as_ref(), keys::AUTH);
        let cart: Vec<CartEntry> = rehydrate(backend.as_ref(), keys::CART);

        let auth = AuthCell::new();
        auth.set(&session.token);

        Self {
            backend,
            session: RwLock::new(session),
            cart: RwLock::new(cart),
            search: RwLock::new(SearchState::default()),
            auth,
        }
    }

    /// Read-only handle to the Authorization cell.
    #[must_use]
    pub fn auth(&self) -> &AuthCell {
        &self.auth
    }

    // =========================================================================
    // Session slice
    // =========================================================================

    /// Current session value.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Replace the session, persist it, and update the Authorization cell.
    ///
    /// The cell update happens while the session lock is held: no reader can
    /// observe a new token with a stale header value or vice versa.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails; the
    /// previous session and header value stay in effect.
    pub fn write_session(&self, next: Session) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&next)?;
        let mut guard = self.session.write().map_err(|_| StoreError::LockPoisoned)?;
        self.backend.store(keys::AUTH, &blob)?;
        *guard = next;
        self.auth.set(&guard.token);
        Ok(())
    }

    // =========================================================================
    // Cart slice
    // =========================================================================

    /// Current cart contents, in insertion order.
    #[must_use]
    pub fn cart(&self) -> Vec<CartEntry> {
        self.cart
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Replace the cart and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails; the
    /// previous cart stays in effect, both in memory and on disk.
    pub fn write_cart(&self, next: Vec<CartEntry>) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&next)?;
        let mut guard = self.cart.write().map_err(|_| StoreError::LockPoisoned)?;
        self.backend.store(keys::CART, &blob)?;
        *guard = next;
        Ok(())
    }

    // =========================================================================
    // Search slice (memory-only)
    // =========================================================================

    /// Current search state.
    #[must_use]
    pub fn search(&self) -> SearchState {
        self.search
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Replace the search state. Never persisted, so never fails.
    pub fn write_search(&self, next: SearchState) {
        if let Ok(mut guard) = self.search.write() {
            *guard = next;
        }
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("auth", &self.auth)
            .field("cart_len", &self.cart.read().map(|c| c.len()).unwrap_or(0))
            .finish_non_exhaustive()
    }
}

/// Load and deserialize one slice, falling back to the default on any
/// failure. Malformed blobs are a warning, never a crash.
fn rehydrate<T: DeserializeOwned + Default>(backend: &dyn StorageBackend, key: &str) -> T {
    let blob = match backend.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted slice, using default");
            return T::default();
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "malformed persisted slice, using default");
            T::default()
        }
    }
}
