//! JSON API behaviour.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use bazaar_integration_tests::{TestHarness, body_json, identity};
use serde_json::json;

fn harness() -> TestHarness {
    TestHarness::new()
        .with_user("admin", identity("u-admin", &["superAdmin", "beta"]))
        .with_user("seller", identity("u-seller", &["virtualStoreOwner"]))
}

#[tokio::test]
async fn test_auth_state_for_anonymous() {
    let app = harness().build();

    let response = app.get("/api/auth/state", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "authenticated": false,
            "userId": null,
            "labels": [],
            "isSystemAdmin": false,
            "isPhysicalStoreOwner": false,
            "isVirtualStoreOwner": false,
        })
    );
}

#[tokio::test]
async fn test_auth_state_reports_flags() {
    let app = harness().build();

    let body = body_json(app.get("/api/auth/state", Some("seller")).await).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["userId"], "u-seller");
    assert_eq!(body["labels"], json!(["virtualStoreOwner"]));
    assert_eq!(body["isSystemAdmin"], false);
    assert_eq!(body["isVirtualStoreOwner"], true);
}

#[tokio::test]
async fn test_access_check_modes() {
    let app = harness().build();

    let cases = [
        (json!({"labels": ["superAdmin", "x"]}), true),
        (json!({"labels": ["superAdmin", "x"], "mode": "allOf"}), false),
        (json!({"labels": ["superAdmin", "beta"], "mode": "allOf"}), true),
        (json!({"labels": ["virtualStoreOwner"], "mode": "noneOf"}), true),
        (json!({"labels": ["beta"], "mode": "noneOf"}), false),
        (json!({"labels": [], "mode": "allOf"}), true),
        (json!({"labels": []}), false),
    ];

    for (request, expected) in cases {
        let response = app
            .post_json("/api/access/check", Some("admin"), &request)
            .await;
        assert_eq!(response.status(), StatusCode::OK, "{request}");
        assert_eq!(body_json(response).await["allowed"], expected, "{request}");
    }
}

#[tokio::test]
async fn test_access_check_is_false_for_anonymous() {
    let app = harness().build();

    for mode in ["anyOf", "allOf", "noneOf"] {
        let request = json!({"labels": ["superAdmin"], "mode": mode});
        let response = app.post_json("/api/access/check", None, &request).await;
        assert_eq!(body_json(response).await["allowed"], false, "{mode}");
    }
}

#[tokio::test]
async fn test_access_check_rejects_invalid_labels() {
    let app = harness().build();

    let request = json!({"labels": ["not a label!"]});
    let response = app
        .post_json("/api/access/check", Some("admin"), &request)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
