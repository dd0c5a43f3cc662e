//! Catalog types as served by the commerce REST API.
//!
//! The API identifies documents with `_id` fields and snake-free JSON keys;
//! these types keep Rust field names and map the wire names with serde
//! attributes. Products are treated as immutable values once fetched.

use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};

/// A product category.
///
/// The same shape appears standalone in the category list and embedded in
/// [`Product::category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category document ID.
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// Display name (e.g., "Electronics").
    pub name: String,
    /// URL-safe slug derived from the name.
    pub slug: String,
}

/// A product as consumed by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product document ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-safe slug derived from the name.
    pub slug: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price in the shop currency's standard unit.
    pub price: f64,
    /// The category the product belongs to.
    pub category: Category,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i64,
    /// Whether the product ships.
    #[serde(default)]
    pub shipping: bool,
}
