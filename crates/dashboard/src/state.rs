//! Application state shared across handlers.

use std::sync::Arc;

use crate::appwrite::AppwriteClient;
use crate::config::DashboardConfig;
use crate::services::{IdentityProvider, StoreDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the identity and store collaborators.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    session_cookie: String,
    identities: Arc<dyn IdentityProvider>,
    stores: Arc<dyn StoreDirectory>,
}

impl AppState {
    /// Create application state backed by Appwrite.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let client = AppwriteClient::new(&config.appwrite);
        Self::with_services(config, Arc::new(client.clone()), Arc::new(client))
    }

    /// Create application state with explicit collaborators.
    #[must_use]
    pub fn with_services(
        config: DashboardConfig,
        identities: Arc<dyn IdentityProvider>,
        stores: Arc<dyn StoreDirectory>,
    ) -> Self {
        let session_cookie = config.appwrite.session_cookie_name();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                session_cookie,
                identities,
                stores,
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Name of the cookie carrying the session secret.
    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.inner.session_cookie
    }

    /// Get the identity provider.
    #[must_use]
    pub fn identities(&self) -> &dyn IdentityProvider {
        self.inner.identities.as_ref()
    }

    /// Get the store directory.
    #[must_use]
    pub fn stores(&self) -> &dyn StoreDirectory {
        self.inner.stores.as_ref()
    }
}
