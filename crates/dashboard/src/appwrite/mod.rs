//! Appwrite REST API client.
//!
//! Covers the two calls the dashboard makes:
//! - `GET /account` with the caller's session, to learn who they are
//! - `GET /databases/{db}/collections/{col}/documents[/{id}]` with the server
//!   API key, to learn who owns a store
//!
//! Store documents are cached using `moka`; account lookups never are, so a
//! label change takes effect on the caller's next request.

mod error;
pub mod types;

pub use error::AppwriteError;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};
use url::Url;

use bazaar_core::{Identity, Store, StoreId, StoreKind, UserId};

use crate::config::AppwriteConfig;
use crate::services::{IdentityProvider, SessionToken, StoreDirectory};

use types::{DocumentList, ErrorBody, StoreDocument};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const SESSION_HEADER: &str = "X-Appwrite-Session";
const KEY_HEADER: &str = "X-Appwrite-Key";
const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Upper bound on stores listed for one owner.
const OWNER_STORE_LIMIT: u32 = 100;

// =============================================================================
// AppwriteClient
// =============================================================================

/// Client for the Appwrite REST API.
#[derive(Clone)]
pub struct AppwriteClient {
    inner: Arc<AppwriteClientInner>,
}

struct AppwriteClientInner {
    client: reqwest::Client,
    config: AppwriteConfig,
    stores: Cache<(StoreKind, StoreId), Store>,
}

impl AppwriteClient {
    /// Create a new Appwrite client.
    #[must_use]
    pub fn new(config: &AppwriteConfig) -> Self {
        let stores = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.store_cache_ttl)
            .build();

        Self {
            inner: Arc::new(AppwriteClientInner {
                client: reqwest::Client::new(),
                config: config.clone(),
                stores,
            }),
        }
    }

    /// Fetch the account behind `session`.
    ///
    /// Returns `Ok(None)` if Appwrite rejects the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Appwrite answers with any other
    /// non-success status, or the account payload is malformed.
    #[instrument(skip_all)]
    pub async fn get_account(
        &self,
        session: &SessionToken,
    ) -> Result<Option<Identity>, AppwriteError> {
        let url = format!("{}/account", self.inner.config.endpoint);

        let response = self
            .inner
            .client
            .get(&url)
            .header(PROJECT_HEADER, &self.inner.config.project_id)
            .header(SESSION_HEADER, session.expose())
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Appwrite rejected the session");
            return Ok(None);
        }

        let body = read_body(response).await?;
        let identity = Identity::from_json(&body)?;
        debug!(user_id = %identity.id, labels = %identity.labels, "Resolved account");
        Ok(Some(identity))
    }

    /// Fetch a store document, using the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the document is malformed.
    #[instrument(skip_all, fields(kind = %kind, store_id = %id))]
    pub async fn get_store(
        &self,
        kind: StoreKind,
        id: &StoreId,
    ) -> Result<Option<Store>, AppwriteError> {
        let key = (kind, id.clone());
        if let Some(store) = self.inner.stores.get(&key).await {
            debug!("Store cache hit");
            return Ok(Some(store));
        }

        let url = format!("{}/{}", self.documents_url(kind), urlencoding::encode(id.as_str()));
        let response = self.server_get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Store not found");
            return Ok(None);
        }

        let body = read_body(response).await?;
        let document: StoreDocument =
            serde_json::from_str(&body).map_err(AppwriteError::MalformedDocument)?;
        let store = document.into_store(kind);

        self.inner.stores.insert(key, store.clone()).await;
        Ok(Some(store))
    }

    /// List stores of `kind` whose `ownerId` is `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a document is malformed.
    #[instrument(skip_all, fields(kind = %kind, owner = %owner))]
    pub async fn list_stores_by_owner(
        &self,
        kind: StoreKind,
        owner: &UserId,
    ) -> Result<Vec<Store>, AppwriteError> {
        let mut url = Url::parse(&self.documents_url(kind))?;
        url.query_pairs_mut()
            .append_pair("queries[]", &equal_query("ownerId", owner.as_str()))
            .append_pair("queries[]", &limit_query(OWNER_STORE_LIMIT));

        let response = self.server_get(url.as_str()).send().await?;
        let body = read_body(response).await?;
        let list: DocumentList<StoreDocument> =
            serde_json::from_str(&body).map_err(AppwriteError::MalformedDocument)?;

        let mut stores = Vec::with_capacity(list.documents.len());
        for document in list.documents {
            let store = document.into_store(kind);
            self.inner
                .stores
                .insert((kind, store.id.clone()), store.clone())
                .await;
            stores.push(store);
        }

        if let Some(missing) = unlisted_count(list.total, stores.len()) {
            warn!(
                total = list.total,
                returned = stores.len(),
                missing,
                "Owner has more stores than fit in one page, list is truncated"
            );
        } else {
            debug!(total = list.total, returned = stores.len(), "Listed owned stores");
        }

        Ok(stores)
    }

    /// URL of the collection holding stores of `kind`.
    fn documents_url(&self, kind: StoreKind) -> String {
        let config = &self.inner.config;
        format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint,
            urlencoding::encode(&config.database_id),
            urlencoding::encode(config.collection_for(kind)),
        )
    }

    /// A GET request authenticated with the server API key.
    fn server_get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .get(url)
            .header(PROJECT_HEADER, &self.inner.config.project_id)
            .header(KEY_HEADER, self.inner.config.api_key.expose_secret())
    }
}

#[async_trait]
impl IdentityProvider for AppwriteClient {
    async fn current_identity(
        &self,
        session: &SessionToken,
    ) -> Result<Option<Identity>, AppwriteError> {
        self.get_account(session).await
    }
}

#[async_trait]
impl StoreDirectory for AppwriteClient {
    async fn find_store(
        &self,
        kind: StoreKind,
        id: &StoreId,
    ) -> Result<Option<Store>, AppwriteError> {
        self.get_store(kind, id).await
    }

    async fn stores_owned_by(
        &self,
        kind: StoreKind,
        owner: &UserId,
    ) -> Result<Vec<Store>, AppwriteError> {
        self.list_stores_by_owner(kind, owner).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Return the body of a successful response, or the matching error.
async fn read_body(response: reqwest::Response) -> Result<String, AppwriteError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map_or(1, seconds_until);
        return Err(AppwriteError::RateLimited(retry_after));
    }

    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(&text);
        tracing::error!(
            status = %status,
            message = %message,
            "Appwrite API returned non-success status"
        );
        return Err(AppwriteError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(text)
}

/// Extract the message from an Appwrite error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| body.chars().take(200).collect(), |err| err.message)
}

/// Seconds from now until the unix timestamp `reset`, at least one.
fn seconds_until(reset: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    reset.saturating_sub(now).max(1)
}

/// How many matching documents a list response left out, if any.
fn unlisted_count(total: u64, returned: usize) -> Option<u64> {
    let returned = u64::try_from(returned).unwrap_or(u64::MAX);
    total.checked_sub(returned).filter(|&missing| missing > 0)
}

/// Appwrite query: `attribute` equals `value`.
fn equal_query(attribute: &str, value: &str) -> String {
    serde_json::json!({
        "method": "equal",
        "attribute": attribute,
        "values": [value],
    })
    .to_string()
}

/// Appwrite query: return at most `limit` documents.
fn limit_query(limit: u32) -> String {
    serde_json::json!({
        "method": "limit",
        "values": [limit],
    })
    .to_string()
}
