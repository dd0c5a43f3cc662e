//! Commerce REST API client.
//!
//! Typed access to the collaborator endpoints over `reqwest`. Read-heavy
//! catalog fetches (categories, product pages, single products) are cached
//! using `moka` (5-minute TTL); filtered fetches and searches always hit
//! the network. Every request carries the Authorization cell's current
//! value verbatim when a session token is armed.

mod cache;
pub mod wire;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use clove_core::{CartEntry, Category, CategoryId, PriceRange, Product, ProductId};

use crate::config::ClientConfig;
use crate::store::AuthCell;
use cache::{CacheKey, CacheValue};
use wire::{
    CategoryListResponse, CategoryProductsResponse, CheckoutTokenResponse, PaymentOutcome,
    PaymentRequest, ProductCountResponse, ProductFilterRequest, ProductListResponse,
    ProductResponse,
};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code returned by the server.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// The API answered with a `success: false` envelope.
    #[error("API rejected {0} request")]
    Rejected(&'static str),

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Client for the commerce REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool, cache, and
/// Authorization cell.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    auth: AuthCell,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// `auth` is the read side of the Authorization cell owned by the state
    /// store; the client never writes it.
    #[must_use]
    pub fn new(config: &ClientConfig, auth: AuthCell) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        let mut base_url = config.api_base.clone();
        // Url::join treats a base without a trailing slash as a file path
        // and would drop its last segment.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                auth,
                cache,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let mut request = self.inner.http.get(url);
        if let Some(token) = self.inner.auth.header_value() {
            request = request.header(AUTHORIZATION, token);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let mut request = self.inner.http.post(url).json(body);
        if let Some(token) = self.inner.auth.header_value() {
            request = request.header(AUTHORIZATION, token);
        }
        Self::decode(request.send().await?).await
    }

    /// Decode a response, mapping rate limits and non-success statuses to
    /// typed errors before attempting to parse the body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let url_path = response.url().path().to_owned();
        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url_path));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let response: CategoryListResponse = self.get_json("api/v1/category/get-category").await?;
        if !response.success {
            return Err(ApiError::Rejected("category list"));
        }

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(response.category.clone()),
            )
            .await;

        Ok(response.category)
    }

    /// Total number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn product_count(&self) -> Result<u64, ApiError> {
        let response: ProductCountResponse = self.get_json("api/v1/product/product-count").await?;
        if !response.success {
            return Err(ApiError::Rejected("product count"));
        }
        Ok(response.total)
    }

    /// One page of the unfiltered product list. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self))]
    pub async fn product_page(&self, page: u32) -> Result<Vec<Product>, ApiError> {
        let cache_key = CacheKey::ProductPage(page);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product page");
            return Ok(products);
        }

        let response: ProductListResponse = self
            .get_json(&format!("api/v1/product/product-list/{page}"))
            .await?;
        if !response.success {
            return Err(ApiError::Rejected("product list"));
        }

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(response.products.clone()))
            .await;

        Ok(response.products)
    }

    /// Products matching the selected category and price filters.
    ///
    /// Never cached - filter combinations are unbounded and results must
    /// reflect the selection the user just made.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self), fields(checked = checked.len(), range = ?range))]
    pub async fn filtered_products(
        &self,
        checked: &[CategoryId],
        range: Option<PriceRange>,
    ) -> Result<Vec<Product>, ApiError> {
        let body = ProductFilterRequest {
            checked: checked.to_vec(),
            radio: range.map_or_else(Vec::new, |r| r.into_pair().to_vec()),
        };

        let response: ProductListResponse = self
            .post_json("api/v1/product/product-filters", &body)
            .await?;
        if !response.success {
            return Err(ApiError::Rejected("product filters"));
        }
        Ok(response.products)
    }

    /// Keyword search. The response is a bare product array, not an
    /// envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(keyword = %keyword))]
    pub async fn search(&self, keyword: &str) -> Result<Vec<Product>, ApiError> {
        self.get_json(&format!("api/v1/product/search/{keyword}"))
            .await
    }

    /// Products belonging to the category with `slug`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category is unknown.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn products_by_category(
        &self,
        slug: &str,
    ) -> Result<(Category, Vec<Product>), ApiError> {
        let response: CategoryProductsResponse = self
            .get_json(&format!("api/v1/product/product-category/{slug}"))
            .await?;
        Ok((response.category, response.products))
    }

    /// A single product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product is unknown.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(slug.to_owned());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response: ProductResponse = self
            .get_json(&format!("api/v1/product/get-product/{slug}"))
            .await?;
        if !response.success {
            return Err(ApiError::Rejected("product"));
        }

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Product(Box::new(response.product.clone())),
            )
            .await;

        Ok(response.product)
    }

    /// Up to three products related to `product` within `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is rejected.
    #[instrument(skip(self), fields(product = %product, category = %category))]
    pub async fn related_products(
        &self,
        product: &ProductId,
        category: &CategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        let response: ProductListResponse = self
            .get_json(&format!(
                "api/v1/product/related-product/{product}/{category}"
            ))
            .await?;
        if !response.success {
            return Err(ApiError::Rejected("related products"));
        }
        Ok(response.products)
    }

    // =========================================================================
    // Checkout Methods (not cached - mutable state)
    // =========================================================================

    /// Obtain the payment gateway client token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn checkout_token(&self) -> Result<String, ApiError> {
        let response: CheckoutTokenResponse =
            self.get_json("api/v1/product/braintree/token").await?;
        Ok(response.client_token)
    }

    /// Submit a payment nonce together with the cart being purchased.
    ///
    /// The outcome envelope is returned as-is so the checkout flow can
    /// distinguish a decline from a transport failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, cart), fields(entries = cart.len()))]
    pub async fn submit_payment(
        &self,
        nonce: &str,
        cart: &[CartEntry],
    ) -> Result<PaymentOutcome, ApiError> {
        let body = PaymentRequest { nonce, cart };
        self.post_json("api/v1/product/braintree/payment", &body)
            .await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}
