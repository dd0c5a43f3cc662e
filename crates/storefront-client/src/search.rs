//! Keyword search flow.
//!
//! Runs the search endpoint and records the outcome in the store's
//! memory-only search slice, so the results page can render from the store
//! after navigation.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::store::{SearchState, StateStore};

/// Errors raised by the search flow.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The keyword was empty after trimming.
    #[error("search keyword cannot be empty")]
    EmptyKeyword,

    /// The search request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The keyword search flow.
#[derive(Clone)]
pub struct SearchFlow {
    api: ApiClient,
    store: Arc<StateStore>,
}

impl SearchFlow {
    /// Create a flow over `api` and `store`.
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<StateStore>) -> Self {
        Self { api, store }
    }

    /// Run a search and record the results in the search slice.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty keyword (before any network call) or a
    /// failed request; the search slice keeps its previous value on failure.
    #[instrument(skip(self), fields(keyword = %keyword))]
    pub async fn run(&self, keyword: &str) -> Result<SearchState, SearchError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let results = self.api.search(keyword).await?;
        let state = SearchState {
            keyword: keyword.to_owned(),
            results,
        };
        self.store.write_search(state.clone());
        Ok(state)
    }

    /// Reset the search slice to its default.
    pub fn clear(&self) {
        self.store.write_search(SearchState::default());
    }
}

impl std::fmt::Debug for SearchFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchFlow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use url::Url;

    use crate::config::ClientConfig;
    use crate::store::{AuthCell, MemoryStorage};

    fn flow() -> SearchFlow {
        #[allow(clippy::unwrap_used)]
        let config = ClientConfig::new(Url::parse("http://localhost:1").unwrap(), "/tmp/unused");
        let store = Arc::new(StateStore::open(Arc::new(MemoryStorage::new())));
        SearchFlow::new(ApiClient::new(&config, AuthCell::new()), store)
    }

    #[tokio::test]
    async fn test_empty_keyword_rejected_before_network() {
        let flow = flow();
        // The API base points at a closed port; an empty keyword must fail
        // fast without ever trying to reach it.
        assert!(matches!(
            flow.run("   ").await,
            Err(SearchError::EmptyKeyword)
        ));
    }
}
