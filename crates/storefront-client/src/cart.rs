//! Cart operations.
//!
//! The cart is a sequence of product snapshots in insertion order. Adding
//! the same product twice appends two entries; nothing aggregates
//! quantities. The pure operations here never mutate their input, and
//! [`CartManager`] couples them to the store so a failed persist leaves the
//! cart exactly as it was.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use clove_core::{CartEntry, Product};

use crate::store::{StateStore, StoreError};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Removal index points past the end of the cart.
    #[error("no cart entry at index {index} (cart has {len} entries)")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Cart length at the time of the call.
        len: usize,
    },

    /// An entry's price is not a finite number, so no total exists.
    #[error("cart entry {index} has a non-finite price")]
    NonFinitePrice {
        /// Index of the offending entry.
        index: usize,
    },

    /// Persisting the mutated cart failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Returns `cart` with a snapshot of `product` appended.
///
/// Duplicates are allowed; the existing entries keep their order.
#[must_use]
pub fn add_entry(cart: &[CartEntry], product: &Product) -> Vec<CartEntry> {
    let mut next = cart.to_vec();
    next.push(CartEntry::from(product));
    next
}

/// Returns `cart` with the entry at `index` excised.
///
/// All other entries keep their relative order.
///
/// # Errors
///
/// Returns [`CartError::IndexOutOfBounds`] if `index` does not name an
/// entry; the input is untouched either way.
pub fn remove_entry(cart: &[CartEntry], index: usize) -> Result<Vec<CartEntry>, CartError> {
    if index >= cart.len() {
        return Err(CartError::IndexOutOfBounds {
            index,
            len: cart.len(),
        });
    }
    let mut next = cart.to_vec();
    next.remove(index);
    Ok(next)
}

/// Sum of entry prices.
///
/// # Errors
///
/// Returns [`CartError::NonFinitePrice`] if any entry's price is NaN or
/// infinite, so callers can render an explicit "cannot compute total" state
/// instead of a poisoned number.
pub fn cart_total(cart: &[CartEntry]) -> Result<f64, CartError> {
    let mut total = 0.0;
    for (index, entry) in cart.iter().enumerate() {
        if !entry.price.is_finite() {
            return Err(CartError::NonFinitePrice { index });
        }
        total += entry.price;
    }
    Ok(total)
}

/// Cart operations coupled to the state store.
///
/// Every mutation runs mutate-then-persist: the new cart value is computed
/// first and only a successful persist makes it current, so a storage
/// failure (or a bad index) leaves both the in-memory and persisted cart at
/// their previous value.
#[derive(Clone)]
pub struct CartManager {
    store: Arc<StateStore>,
}

impl CartManager {
    /// Create a manager over `store`.
    #[must_use]
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Current entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        self.store.cart()
    }

    /// Number of entries (the cart badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.cart().len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.cart().is_empty()
    }

    /// Append a snapshot of `product` and persist.
    ///
    /// Returns the new entry count, for the caller's success notification.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the cart is unchanged.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub fn add(&self, product: &Product) -> Result<usize, CartError> {
        let next = add_entry(&self.store.cart(), product);
        let len = next.len();
        self.store.write_cart(next)?;
        Ok(len)
    }

    /// Remove the entry at `index` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds or persisting fails; the
    /// cart is unchanged in both cases.
    #[instrument(skip(self))]
    pub fn remove(&self, index: usize) -> Result<usize, CartError> {
        let next = remove_entry(&self.store.cart(), index)?;
        let len = next.len();
        self.store.write_cart(next)?;
        Ok(len)
    }

    /// Total price of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry's price is non-finite.
    pub fn total(&self) -> Result<f64, CartError> {
        cart_total(&self.store.cart())
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the cart is unchanged.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), CartError> {
        self.store.write_cart(Vec::new())?;
        Ok(())
    }
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("entries", &self.len())
            .finish()
    }
}
