//! Error surfacing from the collaborator API: rate limits, missing
//! resources, and degraded initial loads.

use clove_storefront_client::api::ApiError;
use clove_storefront_client::catalog::CatalogPhase;

use clove_integration_tests::TestContext;

#[tokio::test]
async fn rate_limit_is_surfaced_with_retry_after() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    ctx.set_rate_limited(true);

    let result = storefront.api().product_count().await;
    assert!(matches!(result, Err(ApiError::RateLimited(7))));
}

#[tokio::test]
async fn unknown_product_is_a_typed_not_found() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    let result = storefront.api().product_by_slug("does-not-exist").await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn unknown_category_is_a_typed_not_found() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    let result = storefront.api().products_by_category("does-not-exist").await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn degraded_initial_load_still_becomes_ready() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    // Every fetch fails; each slice falls back to its default instead of
    // blocking the view.
    ctx.set_rate_limited(true);
    catalog.load_initial().await;

    let state = catalog.state();
    assert_eq!(state.phase, CatalogPhase::Ready);
    assert!(state.categories.is_empty());
    assert_eq!(state.total, 0);
    assert!(state.products.is_empty());

    // Once the API recovers, a reset re-fetches the listing.
    ctx.set_rate_limited(false);
    catalog.reset_filters().await;
    assert_eq!(catalog.state().products.len(), clove_integration_tests::PAGE_SIZE);
}
