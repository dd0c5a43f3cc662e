//! Unified error handling.
//!
//! Each module defines its own error enum; this aggregates them into a
//! single `ClientError` so hosts can hold one error type at the boundary.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::search::SearchError;
use crate::store::{StorageError, StoreError};

/// Top-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Commerce API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// State store operation failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),

    /// Storage backend could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Search operation failed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::from(CartError::IndexOutOfBounds { index: 3, len: 1 });
        assert_eq!(
            err.to_string(),
            "cart error: no cart entry at index 3 (cart has 1 entries)"
        );

        let err = ClientError::from(ConfigError::MissingEnvVar("CLOVE_API_URL".to_owned()));
        assert_eq!(
            err.to_string(),
            "config error: Missing environment variable: CLOVE_API_URL"
        );
    }
}
