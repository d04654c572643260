//! Collaborators the dashboard depends on.
//!
//! Identity lookup and store lookup are the only I/O in the request path.
//! Both sit behind traits so handlers can be exercised without Appwrite.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use bazaar_core::{Identity, Store, StoreId, StoreKind, UserId};

use crate::appwrite::AppwriteError;

/// The Appwrite session secret presented by the browser.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw session secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// The raw secret, for sending to the auth provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Looks up the user behind a session.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the identity for `session`.
    ///
    /// Returns `Ok(None)` when the session is unknown or expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or returns a payload
    /// that is not a well-formed identity.
    async fn current_identity(
        &self,
        session: &SessionToken,
    ) -> Result<Option<Identity>, AppwriteError>;
}

/// Looks up store documents.
#[async_trait]
pub trait StoreDirectory: Send + Sync {
    /// Fetch a single store. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the document is
    /// malformed.
    async fn find_store(&self, kind: StoreKind, id: &StoreId)
    -> Result<Option<Store>, AppwriteError>;

    /// List the stores of `kind` recorded as owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or a document is
    /// malformed.
    async fn stores_owned_by(
        &self,
        kind: StoreKind,
        owner: &UserId,
    ) -> Result<Vec<Store>, AppwriteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("s3cr3t-session");
        assert_eq!(format!("{token:?}"), "SessionToken([REDACTED])");
        assert_eq!(token.expose(), "s3cr3t-session");
    }
}
