//! Integration test harness for the Clove storefront client.
//!
//! Stands up the collaborator commerce API as an in-process `axum` server on
//! an ephemeral port, serving a fixed six-product catalog, and opens real
//! storefront clients against it with file-backed state in a scratch
//! directory.
//!
//! Every request the fixture receives is recorded (path plus Authorization
//! header) so tests can assert which fetch mode the client used and what
//! credentials it sent.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header::AUTHORIZATION};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use clove_storefront_client::config::ClientConfig;
use clove_storefront_client::state::Storefront;

static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// One request the fixture server received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path (e.g. `/api/v1/product/product-list/1`).
    pub path: String,
    /// Authorization header value, if the client sent one.
    pub authorization: Option<String>,
}

/// Log of every request the fixture server has received.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: Mutex<Vec<RecordedRequest>>,
}

impl RequestLog {
    fn push(&self, entry: RecordedRequest) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// All recorded requests, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<RecordedRequest> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of recorded requests whose path contains `fragment`.
    #[must_use]
    pub fn count_matching(&self, fragment: &str) -> usize {
        self.entries()
            .iter()
            .filter(|r| r.path.contains(fragment))
            .count()
    }

    /// The most recent recorded request.
    #[must_use]
    pub fn last(&self) -> Option<RecordedRequest> {
        self.entries().pop()
    }
}

/// Shared fixture state: the request log plus fault-injection switches.
#[derive(Debug, Default)]
struct FixtureState {
    log: RequestLog,
    /// When set, every request is answered with 429 and a `Retry-After`.
    rate_limited: AtomicBool,
    /// Artificial response delay, for superseded-request tests.
    delay_ms: AtomicU64,
}

/// A running fixture API plus the scratch state directory for one test.
pub struct TestContext {
    /// Base URL of the fixture API.
    pub base_url: Url,
    /// Scratch directory for persisted client state.
    pub state_dir: PathBuf,
    fixture: Arc<FixtureState>,
    server: tokio::task::JoinHandle<()>,
}

impl TestContext {
    /// Start the fixture server and allocate a scratch state directory.
    pub async fn new() -> Self {
        // First context in the process wires up test logging; later calls
        // are no-ops.
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "clove_storefront_client=debug".into()),
            )
            .with_test_writer()
            .try_init()
            .ok();

        let fixture = Arc::new(FixtureState::default());
        let app = fixture_router(Arc::clone(&fixture));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fixture listener");
        let addr = listener.local_addr().expect("fixture local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fixture server");
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("fixture base url");

        let n = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let state_dir = std::env::temp_dir().join(format!("clove-it-{}-{n}", std::process::id()));

        Self {
            base_url,
            state_dir,
            fixture,
            server,
        }
    }

    /// Client configuration pointing at the fixture.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone(), &self.state_dir)
    }

    /// Open a storefront client against the fixture.
    #[must_use]
    pub fn storefront(&self) -> Storefront {
        Storefront::open(self.config()).expect("open storefront")
    }

    /// Request log of the fixture server.
    #[must_use]
    pub fn requests(&self) -> &RequestLog {
        &self.fixture.log
    }

    /// Make the fixture answer every request with 429 (`Retry-After: 7`).
    pub fn set_rate_limited(&self, limited: bool) {
        self.fixture.rate_limited.store(limited, Ordering::SeqCst);
    }

    /// Delay every fixture response by `delay`.
    pub fn set_response_delay(&self, delay: Duration) {
        self.fixture
            .delay_ms
            .store(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), Ordering::SeqCst);
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
        std::fs::remove_dir_all(&self.state_dir).ok();
    }
}

// =============================================================================
// Fixture catalog
// =============================================================================

/// Fixture page size for the paginated product list.
pub const PAGE_SIZE: usize = 4;

fn fixture_categories() -> Vec<Value> {
    vec![
        json!({"_id": "c1", "name": "Electronics", "slug": "electronics"}),
        json!({"_id": "c2", "name": "Book", "slug": "book"}),
        json!({"_id": "c3", "name": "Clothing", "slug": "clothing"}),
    ]
}

fn fixture_products() -> Vec<Value> {
    let category = |id: &str| {
        fixture_categories()
            .into_iter()
            .find(|c| c["_id"] == id)
            .expect("fixture category")
    };
    vec![
        json!({
            "_id": "p1", "name": "Laptop", "slug": "laptop",
            "description": "A powerful laptop", "price": 1499.99,
            "category": category("c1"), "quantity": 30, "shipping": true
        }),
        json!({
            "_id": "p2", "name": "Smartphone", "slug": "smartphone",
            "description": "A high-end smartphone", "price": 99.99,
            "category": category("c1"), "quantity": 50, "shipping": false
        }),
        json!({
            "_id": "p3", "name": "Novel", "slug": "novel",
            "description": "A bestselling novel", "price": 14.99,
            "category": category("c2"), "quantity": 200, "shipping": true
        }),
        json!({
            "_id": "p4", "name": "NUS T-shirt", "slug": "nus-tshirt",
            "description": "Plain NUS T-shirt for sale", "price": 4.99,
            "category": category("c3"), "quantity": 500, "shipping": true
        }),
        json!({
            "_id": "p5", "name": "Textbook", "slug": "textbook",
            "description": "A comprehensive textbook", "price": 79.99,
            "category": category("c2"), "quantity": 50, "shipping": false
        }),
        json!({
            "_id": "p6", "name": "The Law of Contract in Singapore", "slug": "the-law-of-contract-in-singapore",
            "description": "A best selling book in Singapore", "price": 54.99,
            "category": category("c2"), "quantity": 200, "shipping": true
        }),
    ]
}

// =============================================================================
// Fixture routes
// =============================================================================

fn fixture_router(fixture: Arc<FixtureState>) -> Router {
    Router::new()
        .route("/api/v1/category/get-category", get(list_categories))
        .route("/api/v1/product/product-count", get(product_count))
        .route("/api/v1/product/product-list/{page}", get(product_list))
        .route("/api/v1/product/product-filters", post(product_filters))
        .route("/api/v1/product/search/{keyword}", get(search_products))
        .route(
            "/api/v1/product/product-category/{slug}",
            get(products_by_category),
        )
        .route("/api/v1/product/get-product/{slug}", get(get_product))
        .route(
            "/api/v1/product/related-product/{pid}/{cid}",
            get(related_products),
        )
        .route("/api/v1/product/braintree/token", get(braintree_token))
        .route("/api/v1/product/braintree/payment", post(braintree_payment))
        .layer(middleware::from_fn_with_state(fixture, record_request))
}

async fn record_request(
    State(fixture): State<Arc<FixtureState>>,
    request: Request,
    next: Next,
) -> Response {
    fixture.log.push(RecordedRequest {
        path: request.uri().path().to_owned(),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    });

    let delay_ms = fixture.delay_ms.load(Ordering::SeqCst);
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    if fixture.rate_limited.load(Ordering::SeqCst) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", "7")],
            "rate limited",
        )
            .into_response();
    }

    next.run(request).await
}

async fn list_categories() -> Json<Value> {
    Json(json!({"success": true, "category": fixture_categories()}))
}

async fn product_count() -> Json<Value> {
    Json(json!({"success": true, "total": fixture_products().len()}))
}

async fn product_list(Path(page): Path<usize>) -> Json<Value> {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    let page_items: Vec<Value> = fixture_products()
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect();
    Json(json!({"success": true, "products": page_items}))
}

#[derive(Debug, Deserialize)]
struct FilterBody {
    #[serde(default)]
    checked: Vec<String>,
    #[serde(default)]
    radio: Vec<f64>,
}

async fn product_filters(Json(body): Json<FilterBody>) -> Json<Value> {
    let products: Vec<Value> = fixture_products()
        .into_iter()
        .filter(|p| {
            if body.checked.is_empty() {
                return true;
            }
            p["category"]["_id"]
                .as_str()
                .is_some_and(|id| body.checked.iter().any(|c| c == id))
        })
        .filter(|p| {
            let [min, max] = body.radio.as_slice() else {
                return true;
            };
            p["price"]
                .as_f64()
                .is_some_and(|price| price >= *min && price <= *max)
        })
        .collect();
    Json(json!({"success": true, "products": products}))
}

async fn search_products(Path(keyword): Path<String>) -> Json<Value> {
    let needle = keyword.to_lowercase();
    let matches: Vec<Value> = fixture_products()
        .into_iter()
        .filter(|p| {
            let name = p["name"].as_str().unwrap_or_default().to_lowercase();
            let description = p["description"].as_str().unwrap_or_default().to_lowercase();
            name.contains(&needle) || description.contains(&needle)
        })
        .collect();
    // Search responds with the bare array, not an envelope.
    Json(json!(matches))
}

async fn products_by_category(Path(slug): Path<String>) -> Response {
    let Some(category) = fixture_categories().into_iter().find(|c| c["slug"] == *slug) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Category not found"})),
        )
            .into_response();
    };
    let products: Vec<Value> = fixture_products()
        .into_iter()
        .filter(|p| p["category"]["slug"] == *slug)
        .collect();
    Json(json!({"products": products, "category": category})).into_response()
}

async fn get_product(Path(slug): Path<String>) -> Response {
    match fixture_products().into_iter().find(|p| p["slug"] == *slug) {
        Some(product) => Json(json!({"success": true, "product": product})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Product not found"})),
        )
            .into_response(),
    }
}

async fn related_products(Path((pid, cid)): Path<(String, String)>) -> Json<Value> {
    let related: Vec<Value> = fixture_products()
        .into_iter()
        .filter(|p| p["category"]["_id"] == *cid && p["_id"] != *pid)
        .take(3)
        .collect();
    Json(json!({"success": true, "products": related}))
}

async fn braintree_token() -> Json<Value> {
    Json(json!({"clientToken": "sandbox_fixture_client_token"}))
}

#[derive(Debug, Deserialize)]
struct PaymentBody {
    nonce: String,
    #[serde(default)]
    cart: Vec<Value>,
}

async fn braintree_payment(Json(body): Json<PaymentBody>) -> Json<Value> {
    if body.cart.is_empty() {
        return Json(json!({"success": false, "message": "Cart is empty"}));
    }
    if body.nonce == "fake-invalid-nonce" {
        return Json(json!({"success": false, "message": "Transaction declined"}));
    }
    Json(json!({"success": true}))
}
