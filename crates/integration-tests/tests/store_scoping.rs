//! Store owners only ever see their own stores.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_core::StoreKind;
use bazaar_integration_tests::{TestHarness, body_text, identity, location, store};

fn harness() -> TestHarness {
    TestHarness::new()
        .with_user("admin", identity("u-admin", &["superAdmin"]))
        .with_user("alice", identity("u-alice", &["physicalStoreOwner"]))
        .with_user("bob", identity("u-bob", &["physicalStoreOwner"]))
        .with_user("carol", identity("u-carol", &["virtualStoreOwner"]))
        .with_user("former", identity("u-former", &[]))
        .with_store(store(StoreKind::Physical, "alice-shop", "u-alice"))
        .with_store(store(StoreKind::Physical, "bob-shop", "u-bob"))
        .with_store(store(StoreKind::Virtual, "carol-popup", "u-carol"))
        .with_store(store(StoreKind::Physical, "former-shop", "u-former"))
}

#[tokio::test]
async fn test_owner_sees_own_store() {
    let app = harness().build();

    let response = app
        .get("/dashboard/physical-stores/alice-shop", Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Store alice-shop"));
}

#[tokio::test]
async fn test_owner_cannot_see_another_owners_store() {
    let app = harness().build();

    let response = app
        .get("/dashboard/physical-stores/bob-shop", Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_store_kind_must_match_owner_label() {
    let app = harness().build();

    let response = app
        .get("/dashboard/virtual-stores/carol-popup", Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.stores.lookups(), 0);
}

#[tokio::test]
async fn test_recorded_owner_without_label_is_denied() {
    let app = harness().build();

    let response = app
        .get("/dashboard/physical-stores/former-shop", Some("former"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sees_every_store() {
    let app = harness().build();

    for path in [
        "/dashboard/physical-stores/alice-shop",
        "/dashboard/physical-stores/bob-shop",
        "/dashboard/virtual-stores/carol-popup",
    ] {
        let response = app.get(path, Some("admin")).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_text(response).await.contains("Viewing as administrator"));
    }
}

#[tokio::test]
async fn test_anonymous_is_redirected_before_lookup() {
    let app = harness().build();

    let response = app.get("/dashboard/physical-stores/no-such-store", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/sign-in?next=%2Fdashboard%2Fphysical-stores%2Fno-such-store"
    );
    assert_eq!(app.stores.lookups(), 0);
}

#[tokio::test]
async fn test_unknown_store_is_not_found() {
    let app = harness().build();

    let response = app
        .get("/dashboard/physical-stores/no-such-store", Some("alice"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_lists_only_owned_stores() {
    let app = harness().build();

    let response = app.get("/dashboard/physical-stores", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("alice-shop"));
    assert!(!body.contains("bob-shop"));
}

#[tokio::test]
async fn test_store_redirect_keeps_query_string() {
    let app = harness().build();

    let response = app
        .get("/dashboard/physical-stores/alice-shop?tab=orders", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/sign-in?next=%2Fdashboard%2Fphysical-stores%2Falice-shop%3Ftab%3Dorders"
    );
}
