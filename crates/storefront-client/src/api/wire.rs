//! Request and response shapes for the commerce REST API.
//!
//! Each endpoint has its own envelope; most wrap their payload with a
//! `success` flag, while keyword search returns the product array bare.
//! Field names follow the wire (`clientToken`, `radio`), not Rust style.

use serde::{Deserialize, Serialize};

use clove_core::{CartEntry, Category, CategoryId, Product};

/// `GET /api/v1/category/get-category`
#[derive(Debug, Deserialize)]
pub struct CategoryListResponse {
    pub success: bool,
    #[serde(default)]
    pub category: Vec<Category>,
}

/// `GET /api/v1/product/product-count`
#[derive(Debug, Deserialize)]
pub struct ProductCountResponse {
    pub success: bool,
    #[serde(default)]
    pub total: u64,
}

/// `GET /api/v1/product/product-list/:page` and
/// `GET /api/v1/product/related-product/:pid/:cid`
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    pub success: bool,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Body of `POST /api/v1/product/product-filters`.
///
/// `radio` is the selected price bracket as `[min, max]`, or empty when no
/// bracket is selected.
#[derive(Debug, Serialize)]
pub struct ProductFilterRequest {
    pub checked: Vec<CategoryId>,
    pub radio: Vec<f64>,
}

/// `GET /api/v1/product/product-category/:slug` (no `success` flag).
#[derive(Debug, Deserialize)]
pub struct CategoryProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
    pub category: Category,
}

/// `GET /api/v1/product/get-product/:slug`
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// `GET /api/v1/product/braintree/token`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTokenResponse {
    pub client_token: String,
}

/// Body of `POST /api/v1/product/braintree/payment`.
#[derive(Debug, Serialize)]
pub struct PaymentRequest<'a> {
    pub nonce: &'a str,
    pub cart: &'a [CartEntry],
}

/// Response of `POST /api/v1/product/braintree/payment`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
