//! Keyword search: the bare-array response shape and the memory-only search
//! slice.

use clove_storefront_client::search::SearchError;

use clove_integration_tests::TestContext;

#[tokio::test]
async fn search_records_results_in_the_search_slice() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    let state = storefront.search().run("book").await.expect("search");

    assert_eq!(state.keyword, "book");
    let mut names: Vec<&str> = state.results.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        ["Textbook", "The Law of Contract in Singapore"]
    );

    // The slice mirrors what the flow returned.
    assert_eq!(storefront.store().search(), state);
}

#[tokio::test]
async fn search_keyword_is_trimmed_and_empty_is_rejected() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    let state = storefront.search().run("  novel  ").await.expect("search");
    assert_eq!(state.keyword, "novel");
    assert_eq!(state.results.len(), 1);

    let result = storefront.search().run("   ").await;
    assert!(matches!(result, Err(SearchError::EmptyKeyword)));
    assert_eq!(ctx.requests().count_matching("search"), 1);
}

#[tokio::test]
async fn search_slice_does_not_survive_a_restart() {
    let ctx = TestContext::new().await;

    {
        let storefront = ctx.storefront();
        storefront.search().run("laptop").await.expect("search");
        assert_eq!(storefront.store().search().keyword, "laptop");
    }

    let reopened = ctx.storefront();
    assert_eq!(reopened.store().search().keyword, "");
    assert!(reopened.store().search().results.is_empty());
}

#[tokio::test]
async fn clear_resets_the_slice() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    storefront.search().run("novel").await.expect("search");
    storefront.search().clear();

    assert!(storefront.store().search().results.is_empty());
}
