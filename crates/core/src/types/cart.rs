//! Cart entry type.
//!
//! A cart entry is a snapshot of a product taken at the moment it was added
//! to the cart. Only the fields the cart contract documents are kept; extra
//! fields in previously persisted blobs are ignored on rehydration so older
//! carts keep loading. Duplicate entries are allowed - the cart is a plain
//! sequence in insertion order with no quantity aggregation.

use serde::{Deserialize, Serialize};

use crate::types::catalog::Product;
use crate::types::id::ProductId;

/// A product snapshot held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    /// ID of the product this entry snapshots.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Product description at add time.
    #[serde(default)]
    pub description: String,
    /// Unit price at add time.
    pub price: f64,
}

impl From<&Product> for CartEntry {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
        }
    }
}
