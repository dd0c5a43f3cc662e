//! Checkout flow against the payment gateway endpoints.
//!
//! The gateway integration is two calls: fetch a client token to initialize
//! the hosted payment fields, then submit the resulting payment nonce
//! together with the cart being purchased. A successful payment clears the
//! persisted cart; anything else leaves it intact for another attempt.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};
use crate::store::{StateStore, StoreError};

/// Errors raised by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to purchase.
    #[error("cart is empty")]
    EmptyCart,

    /// The gateway rejected the payment.
    #[error("payment declined: {0}")]
    Declined(String),

    /// A gateway request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Clearing the cart after a successful payment failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The checkout flow.
#[derive(Clone)]
pub struct Checkout {
    api: ApiClient,
    store: Arc<StateStore>,
}

impl Checkout {
    /// Create a flow over `api` and `store`.
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<StateStore>) -> Self {
        Self { api, store }
    }

    /// Obtain the gateway client token for hosted payment fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the token request fails.
    #[instrument(skip(self))]
    pub async fn client_token(&self) -> Result<String, CheckoutError> {
        Ok(self.api.checkout_token().await?)
    }

    /// Submit `nonce` with the current cart.
    ///
    /// On a success envelope the cart slice is cleared, in memory and in
    /// storage. On a decline or transport failure the cart is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without a network call when
    /// there is nothing to purchase, [`CheckoutError::Declined`] on a
    /// non-success envelope, and transport/storage errors otherwise.
    #[instrument(skip(self, nonce))]
    pub async fn submit(&self, nonce: &str) -> Result<(), CheckoutError> {
        let cart = self.store.cart();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let outcome = self.api.submit_payment(nonce, &cart).await?;
        if !outcome.success {
            return Err(CheckoutError::Declined(
                outcome.message.unwrap_or_else(|| "no reason given".to_owned()),
            ));
        }

        self.store.write_cart(Vec::new())?;
        info!(entries = cart.len(), "payment accepted, cart cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use url::Url;

    use crate::config::ClientConfig;
    use crate::store::{AuthCell, MemoryStorage};

    #[tokio::test]
    async fn test_empty_cart_rejected_before_network() {
        #[allow(clippy::unwrap_used)]
        let config = ClientConfig::new(Url::parse("http://localhost:1").unwrap(), "/tmp/unused");
        let store = Arc::new(StateStore::open(Arc::new(MemoryStorage::new())));
        let checkout = Checkout::new(ApiClient::new(&config, AuthCell::new()), store);

        assert!(matches!(
            checkout.submit("nonce").await,
            Err(CheckoutError::EmptyCart)
        ));
    }
}
