//! The identity provider is consulted at most once per request.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_integration_tests::{TestHarness, identity};

#[tokio::test]
async fn test_one_lookup_per_request() {
    let app = TestHarness::new()
        .with_user("admin", identity("u1", &["superAdmin"]))
        .build();

    app.get("/admin", Some("admin")).await;
    assert_eq!(app.identities.calls(), 1);

    app.get("/api/auth/state", Some("admin")).await;
    assert_eq!(app.identities.calls(), 2);
}

#[tokio::test]
async fn test_no_lookup_without_session_cookie() {
    let app = TestHarness::new().build();

    app.get("/admin", None).await;
    app.get("/api/auth/state", None).await;
    assert_eq!(app.identities.calls(), 0);
}

#[tokio::test]
async fn test_health_skips_identity_lookup() {
    let app = TestHarness::new()
        .with_user("admin", identity("u1", &["superAdmin"]))
        .build();

    let response = app.get("/health", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.identities.calls(), 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestHarness::new().build();

    let response = app.get("/health", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_label_changes_apply_on_next_request() {
    let before = TestHarness::new()
        .with_user("s", identity("u1", &[]))
        .build();
    assert_eq!(
        before.get("/admin", Some("s")).await.status(),
        StatusCode::FORBIDDEN
    );

    let after = TestHarness::new()
        .with_user("s", identity("u1", &["superAdmin"]))
        .build();
    assert_eq!(after.get("/admin", Some("s")).await.status(), StatusCode::OK);
}
