//! Catalog browsing against the fixture API: initial load, pagination,
//! server-side filtering, and the reset path back to the paginated view.

use clove_core::{CategoryId, PriceRange};
use clove_storefront_client::catalog::CatalogPhase;

use clove_integration_tests::{PAGE_SIZE, TestContext};

#[tokio::test]
async fn initial_load_runs_three_fetches_and_becomes_ready() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    assert_eq!(catalog.state().phase, CatalogPhase::Idle);

    catalog.load_initial().await;

    let state = catalog.state();
    assert_eq!(state.phase, CatalogPhase::Ready);
    assert_eq!(state.categories.len(), 3);
    assert_eq!(state.total, 6);
    assert_eq!(state.products.len(), PAGE_SIZE);
    assert_eq!(state.page, 1);

    // All three fetches went out.
    assert_eq!(ctx.requests().count_matching("get-category"), 1);
    assert_eq!(ctx.requests().count_matching("product-count"), 1);
    assert_eq!(ctx.requests().count_matching("product-list/1"), 1);
}

#[tokio::test]
async fn load_more_appends_the_next_page() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;
    assert!(catalog.has_more());

    catalog.load_more().await;

    let state = catalog.state();
    assert_eq!(state.phase, CatalogPhase::Ready);
    assert_eq!(state.products.len(), 6);
    assert_eq!(state.page, 2);
    assert!(!catalog.has_more());

    // Pages arrived in order with no reshuffling.
    let names: Vec<&str> = state.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names[0], "Laptop");
    assert_eq!(names[5], "The Law of Contract in Singapore");
}

#[tokio::test]
async fn price_filter_uses_the_filtered_fetch() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;
    catalog
        .set_price_range(Some(PriceRange::new(0.0, 19.99)))
        .await;

    let state = catalog.state();
    assert_eq!(state.phase, CatalogPhase::Ready);
    let mut names: Vec<&str> = state.products.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["NUS T-shirt", "Novel"]);

    // The selection was resolved server-side, not by slicing loaded pages.
    assert_eq!(ctx.requests().count_matching("product-filters"), 1);
}

#[tokio::test]
async fn category_and_price_filters_are_conjunctive() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;
    catalog
        .toggle_category(CategoryId::new("c2"), true)
        .await;
    catalog
        .set_price_range(Some(PriceRange::new(40.0, 100.0)))
        .await;

    let state = catalog.state();
    let mut names: Vec<&str> = state.products.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Textbook", "The Law of Contract in Singapore"]);
}

#[tokio::test]
async fn unchecking_the_last_filter_restores_the_paginated_view() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;
    catalog.toggle_category(CategoryId::new("c2"), true).await;
    assert_eq!(catalog.state().products.len(), 3);

    catalog.toggle_category(CategoryId::new("c2"), false).await;

    let state = catalog.state();
    assert!(!state.filters.is_active());
    assert_eq!(state.products.len(), PAGE_SIZE);
    assert_eq!(state.page, 1);
}

#[tokio::test]
async fn reset_clears_both_filters_in_one_step() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;
    catalog.toggle_category(CategoryId::new("c1"), true).await;
    catalog
        .set_price_range(Some(PriceRange::new(0.0, 100.0)))
        .await;
    assert!(catalog.state().filters.is_active());

    catalog.reset_filters().await;

    let state = catalog.state();
    assert!(!state.filters.is_active());
    assert_eq!(state.products.len(), PAGE_SIZE);
}

#[tokio::test]
async fn product_detail_and_related_products() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let api = storefront.api();

    let product = api.product_by_slug("novel").await.expect("product");
    assert_eq!(product.name, "Novel");

    let related = api
        .related_products(&product.id, &product.category.id)
        .await
        .expect("related");
    assert!(related.len() <= 3);
    assert!(related.iter().all(|p| p.id != product.id));
    assert!(related.iter().all(|p| p.category.id == product.category.id));

    let (category, products) = api.products_by_category("book").await.expect("by category");
    assert_eq!(category.name, "Book");
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn superseded_filter_response_never_overwrites_newer_state() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let catalog = storefront.catalog();

    catalog.load_initial().await;

    // Start a slow filtered fetch, then reset the filters while it is
    // still in flight.
    ctx.set_response_delay(std::time::Duration::from_millis(300));
    let slow = {
        let catalog = catalog.clone();
        tokio::spawn(async move {
            catalog
                .set_price_range(Some(PriceRange::new(0.0, 19.99)))
                .await;
        })
    };
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    ctx.set_response_delay(std::time::Duration::ZERO);
    catalog.reset_filters().await;
    slow.await.expect("slow filter task");

    // The late filtered response belongs to an older generation and was
    // discarded; the view reflects the reset.
    let state = catalog.state();
    assert!(!state.filters.is_active());
    assert_eq!(state.products.len(), PAGE_SIZE);
    assert_eq!(state.phase, CatalogPhase::Ready);
}

#[tokio::test]
async fn repeat_catalog_reads_are_served_from_cache() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();
    let api = storefront.api();

    api.categories().await.expect("categories");
    api.categories().await.expect("categories again");
    assert_eq!(ctx.requests().count_matching("get-category"), 1);

    api.invalidate_all().await;
    api.categories().await.expect("categories after invalidate");
    assert_eq!(ctx.requests().count_matching("get-category"), 2);
}
