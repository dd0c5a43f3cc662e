//! Session persistence and the coupling between session writes and the
//! outbound Authorization header.

use std::fs;

use clove_core::{Email, Role, Session, UserSummary};

use clove_integration_tests::TestContext;

fn logged_in_session(token: &str) -> Session {
    Session {
        user: Some(UserSummary {
            name: "Ada".to_owned(),
            email: Email::parse("ada@example.com").expect("valid email"),
            phone: "555-0100".to_owned(),
            address: "1 Loop Rd".to_owned(),
            role: Role::Customer,
        }),
        token: token.to_owned(),
    }
}

#[tokio::test]
async fn login_sends_the_token_on_subsequent_requests() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    // Anonymous requests carry no Authorization header.
    storefront.api().product_count().await.expect("count");
    assert_eq!(
        ctx.requests().last().expect("recorded").authorization,
        None
    );

    storefront.login(logged_in_session("abc")).expect("login");

    storefront.api().checkout_token().await.expect("token");
    assert_eq!(
        ctx.requests().last().expect("recorded").authorization.as_deref(),
        Some("abc")
    );
}

#[tokio::test]
async fn logout_clears_the_header_and_resets_the_session() {
    let ctx = TestContext::new().await;
    let storefront = ctx.storefront();

    storefront.login(logged_in_session("abc")).expect("login");
    storefront.logout().expect("logout");

    assert_eq!(storefront.store().session(), Session::anonymous());

    storefront.api().product_count().await.expect("count");
    assert_eq!(ctx.requests().last().expect("recorded").authorization, None);
}

#[tokio::test]
async fn rehydrated_session_arms_the_header_without_a_fresh_login() {
    let ctx = TestContext::new().await;

    {
        let storefront = ctx.storefront();
        storefront
            .login(logged_in_session("persisted-token"))
            .expect("login");
    }

    // The session blob landed under the fixed "auth" key.
    let blob = fs::read_to_string(ctx.state_dir.join("auth.json")).expect("auth blob");
    assert!(blob.contains("persisted-token"));

    // A fresh client over the same state directory authenticates
    // immediately from the rehydrated token.
    let reopened = ctx.storefront();
    let session = reopened.store().session();
    assert!(session.is_authenticated());
    assert_eq!(session.user.expect("user").name, "Ada");

    reopened.api().product_count().await.expect("count");
    assert_eq!(
        ctx.requests().last().expect("recorded").authorization.as_deref(),
        Some("persisted-token")
    );
}

#[tokio::test]
async fn malformed_session_blob_falls_back_to_anonymous() {
    let ctx = TestContext::new().await;

    fs::create_dir_all(&ctx.state_dir).expect("create state dir");
    fs::write(ctx.state_dir.join("auth.json"), "][").expect("seed malformed blob");

    let storefront = ctx.storefront();
    assert_eq!(storefront.store().session(), Session::anonymous());

    storefront.api().product_count().await.expect("count");
    assert_eq!(ctx.requests().last().expect("recorded").authorization, None);
}
