//! Appwrite client errors.

use thiserror::Error;

use bazaar_core::IdentityError;

/// Errors that can occur when talking to the Appwrite REST API.
#[derive(Debug, Error)]
pub enum AppwriteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Appwrite answered with a non-success status.
    #[error("Appwrite API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or a prefix of the raw body.
        message: String,
    },

    /// Rate limited by Appwrite.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The account payload is not a usable identity.
    #[error("Malformed identity: {0}")]
    MalformedIdentity(#[from] IdentityError),

    /// A document payload did not match the expected shape.
    #[error("Malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
