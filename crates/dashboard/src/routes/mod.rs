//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Health check (no identity lookup)
//! GET  /                                     - Storefront home
//!
//! # Auth
//! GET  /sign-in                              - Sign-in page
//! GET  /auth/landing                         - Redirect to the caller's dashboard
//!
//! # Admin (superAdmin)
//! GET  /admin                                - Marketplace overview
//!
//! # Seller dashboards (store owners, scoped to their own stores)
//! GET  /dashboard/physical-stores            - Caller's physical stores
//! GET  /dashboard/physical-stores/{store_id} - Physical store dashboard
//! GET  /dashboard/virtual-stores             - Caller's virtual stores
//! GET  /dashboard/virtual-stores/{store_id}  - Virtual store dashboard
//!
//! # API
//! GET  /api/auth/state                       - Caller's role flags
//! POST /api/access/check                     - Evaluate a label requirement
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod home;
pub mod stores;
pub mod views;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{identity_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the physical store routes router.
pub fn physical_store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::physical_index))
        .route("/{store_id}", get(stores::physical_show))
}

/// Create the virtual store routes router.
pub fn virtual_store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::virtual_index))
        .route("/{store_id}", get(stores::virtual_show))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/state", get(api::access::auth_state))
        .route("/access/check", post(api::access::check_access))
}

/// Create all page and API routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/sign-in", get(auth::sign_in_page))
        .route("/auth/landing", get(auth::landing))
        .route("/admin", get(admin::dashboard))
        .nest("/dashboard/physical-stores", physical_store_routes())
        .nest("/dashboard/virtual-stores", virtual_store_routes())
        .nest("/api", api_routes())
}

/// Build the complete application with its middleware stack.
///
/// `/health` is added below the identity layer so health checks never reach Appwrite.
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .route("/health", get(health))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
