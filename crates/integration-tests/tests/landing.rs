//! Post-sign-in routing.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_integration_tests::{TestHarness, body_text, identity, location};

fn harness() -> TestHarness {
    TestHarness::new()
        .with_user("admin", identity("u1", &["superAdmin", "physicalStoreOwner"]))
        .with_user("physical", identity("u2", &["physicalStoreOwner", "virtualStoreOwner"]))
        .with_user("virtual", identity("u3", &["virtualStoreOwner"]))
        .with_user("shopper", identity("u4", &[]))
}

#[tokio::test]
async fn test_landing_prefers_most_privileged_role() {
    let app = harness().build();

    for (session, expected) in [
        ("admin", "/admin"),
        ("physical", "/dashboard/physical-stores"),
        ("virtual", "/dashboard/virtual-stores"),
        ("shopper", "/"),
    ] {
        let response = app.get("/auth/landing", Some(session)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{session}");
        assert_eq!(location(&response), expected, "{session}");
    }
}

#[tokio::test]
async fn test_landing_sends_anonymous_to_sign_in() {
    let app = harness().build();

    let response = app.get("/auth/landing", None).await;
    assert_eq!(location(&response), "/sign-in");

    let response = app.get("/auth/landing?next=%2Fadmin", None).await;
    assert_eq!(location(&response), "/sign-in?next=%2Fadmin");
}

#[tokio::test]
async fn test_landing_honours_local_next_only() {
    let app = harness().build();

    let response = app
        .get("/auth/landing?next=%2Fdashboard%2Fvirtual-stores", Some("virtual"))
        .await;
    assert_eq!(location(&response), "/dashboard/virtual-stores");

    let response = app
        .get("/auth/landing?next=%2F%2Fevil.example.com", Some("virtual"))
        .await;
    assert_eq!(location(&response), "/dashboard/virtual-stores");
}

#[tokio::test]
async fn test_sign_in_page() {
    let app = harness().build();

    let response = app.get("/sign-in?next=%2Fadmin", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("next=%2Fadmin")
    );

    let response = app.get("/sign-in?next=%2Fadmin", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/landing?next=%2Fadmin");
}

#[tokio::test]
async fn test_home_links_privileged_callers_to_dashboard() {
    let app = harness().build();

    let body = body_text(app.get("/", Some("virtual")).await).await;
    assert!(body.contains("Go to your dashboard"));

    let body = body_text(app.get("/", Some("shopper")).await).await;
    assert!(!body.contains("Go to your dashboard"));

    let body = body_text(app.get("/", None).await).await;
    assert!(body.contains("Sign in"));
}
