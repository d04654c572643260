//! Integration test harness for the Bazaar dashboard.
//!
//! Builds the full router (middleware included) against in-memory
//! collaborators, so tests drive real requests through
//! `tower::ServiceExt::oneshot` without an Appwrite instance.
//!
//! # Example
//!
//! ```rust,ignore
//! let harness = TestHarness::new()
//!     .with_user("admin-session", identity("u1", &["superAdmin"]));
//!
//! let response = harness.get("/admin", Some("admin-session")).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use secrecy::SecretString;
use tower::ServiceExt;

use bazaar_core::{Identity, LabelSet, Store, StoreId, StoreKind, UserId};
use bazaar_dashboard::appwrite::AppwriteError;
use bazaar_dashboard::config::{AppwriteConfig, DashboardConfig};
use bazaar_dashboard::services::{IdentityProvider, SessionToken, StoreDirectory};
use bazaar_dashboard::state::AppState;

/// Appwrite project the test config points at.
pub const PROJECT_ID: &str = "bazaar";

/// Session cookie name for [`PROJECT_ID`].
pub const SESSION_COOKIE: &str = "a_session_bazaar";

// =============================================================================
// Fixtures
// =============================================================================

/// Build an identity with the given labels.
pub fn identity(id: &str, labels: &[&str]) -> Identity {
    Identity::new(
        UserId::parse(id).unwrap(),
        LabelSet::parse_many(labels).unwrap(),
    )
}

/// Build a store owned by `owner`.
pub fn store(kind: StoreKind, id: &str, owner: &str) -> Store {
    Store {
        id: StoreId::parse(id).unwrap(),
        kind,
        owner_id: UserId::parse(owner).unwrap(),
        name: format!("Store {id}"),
    }
}

/// Configuration that never reaches a real Appwrite.
pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3002,
        appwrite: AppwriteConfig {
            endpoint: "http://127.0.0.1:9/v1".to_string(),
            project_id: PROJECT_ID.to_string(),
            api_key: SecretString::from("standard_4f1a9c0e7b3d82a65fe1"),
            database_id: "main".to_string(),
            physical_stores_collection_id: "physicalStores".to_string(),
            virtual_stores_collection_id: "virtualStores".to_string(),
            store_cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// =============================================================================
// Fake collaborators
// =============================================================================

/// Identity provider backed by a session map, counting every lookup.
#[derive(Default)]
pub struct FakeIdentityProvider {
    sessions: HashMap<String, Identity>,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeIdentityProvider {
    /// Number of lookups made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn current_identity(
        &self,
        session: &SessionToken,
    ) -> Result<Option<Identity>, AppwriteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing {
            return Err(AppwriteError::Api {
                status: 500,
                message: "Server Error".to_string(),
            });
        }

        Ok(self.sessions.get(session.expose()).cloned())
    }
}

/// Store directory backed by a list.
#[derive(Default)]
pub struct FakeStoreDirectory {
    stores: Vec<Store>,
    lookups: AtomicUsize,
}

impl FakeStoreDirectory {
    /// Number of `find_store` calls made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreDirectory for FakeStoreDirectory {
    async fn find_store(
        &self,
        kind: StoreKind,
        id: &StoreId,
    ) -> Result<Option<Store>, AppwriteError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .stores
            .iter()
            .find(|store| store.kind == kind && &store.id == id)
            .cloned())
    }

    async fn stores_owned_by(
        &self,
        kind: StoreKind,
        owner: &UserId,
    ) -> Result<Vec<Store>, AppwriteError> {
        Ok(self
            .stores
            .iter()
            .filter(|store| store.kind == kind && &store.owner_id == owner)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Harness
// =============================================================================

/// The dashboard wired to fake collaborators.
#[derive(Default)]
pub struct TestHarness {
    identities: FakeIdentityProvider,
    stores: FakeStoreDirectory,
}

/// A test run's app plus handles on its collaborators.
pub struct TestApp {
    state: AppState,
    pub identities: Arc<FakeIdentityProvider>,
    pub stores: Arc<FakeStoreDirectory>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity` as the owner of `session`.
    #[must_use]
    pub fn with_user(mut self, session: &str, identity: Identity) -> Self {
        self.identities
            .sessions
            .insert(session.to_string(), identity);
        self
    }

    /// Add a store document.
    #[must_use]
    pub fn with_store(mut self, store: Store) -> Self {
        self.stores.stores.push(store);
        self
    }

    /// Make every identity lookup fail.
    #[must_use]
    pub fn with_failing_identity_provider(mut self) -> Self {
        self.identities.failing = true;
        self
    }

    pub fn build(self) -> TestApp {
        let identities = Arc::new(self.identities);
        let stores = Arc::new(self.stores);
        let state = AppState::with_services(test_config(), identities.clone(), stores.clone());

        TestApp {
            state,
            identities,
            stores,
        }
    }
}

impl TestApp {
    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        bazaar_dashboard::app(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    /// `GET path`, optionally carrying a session cookie.
    pub async fn get(&self, path: &str, session: Option<&str>) -> Response<Body> {
        self.send(request("GET", path, session, Body::empty()))
            .await
    }

    /// `POST path` with a JSON body, optionally carrying a session cookie.
    pub async fn post_json(
        &self,
        path: &str,
        session: Option<&str>,
        body: &serde_json::Value,
    ) -> Response<Body> {
        let mut request = request("POST", path, session, Body::from(body.to_string()));
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        self.send(request).await
    }
}

fn request(method: &str, path: &str, session: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={session}"));
    }
    builder.body(body).unwrap()
}

// =============================================================================
// Response helpers
// =============================================================================

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

/// Read the whole body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read the whole body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
