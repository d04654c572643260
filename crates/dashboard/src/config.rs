//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `APPWRITE_ENDPOINT` - Appwrite API endpoint (e.g., `https://cloud.appwrite.io/v1`)
//! - `APPWRITE_PROJECT_ID` - Appwrite project ID
//! - `APPWRITE_API_KEY` - Server API key with `documents.read` scope
//! - `APPWRITE_DATABASE_ID` - Database holding the store collections
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3002)
//! - `APPWRITE_PHYSICAL_STORES_COLLECTION_ID` - (default: `physicalStores`)
//! - `APPWRITE_VIRTUAL_STORES_COLLECTION_ID` - (default: `virtualStores`)
//! - `STORE_CACHE_TTL_SECS` - Store document cache TTL (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bazaar_core::StoreKind;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_STORE_CACHE_TTL_SECS: u64 = 60;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Appwrite connection settings
    pub appwrite: AppwriteConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 - 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 - 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Appwrite configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AppwriteConfig {
    /// API endpoint without trailing slash
    pub endpoint: String,
    /// Project ID (also names the session cookie)
    pub project_id: String,
    /// Server API key
    pub api_key: SecretString,
    /// Database holding the store collections
    pub database_id: String,
    /// Collection of physical store documents
    pub physical_stores_collection_id: String,
    /// Collection of virtual store documents
    pub virtual_stores_collection_id: String,
    /// How long store documents stay cached
    pub store_cache_ttl: Duration,
}

impl std::fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field(
                "physical_stores_collection_id",
                &self.physical_stores_collection_id,
            )
            .field(
                "virtual_stores_collection_id",
                &self.virtual_stores_collection_id,
            )
            .field("store_cache_ttl", &self.store_cache_ttl)
            .finish()
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;

        let appwrite = AppwriteConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            appwrite,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AppwriteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store_cache_ttl = match get_optional_env("STORE_CACHE_TTL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("STORE_CACHE_TTL_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_STORE_CACHE_TTL_SECS,
        };

        Ok(Self {
            endpoint: get_url("APPWRITE_ENDPOINT")?,
            project_id: get_required_env("APPWRITE_PROJECT_ID")?,
            api_key: get_validated_secret("APPWRITE_API_KEY")?,
            database_id: get_required_env("APPWRITE_DATABASE_ID")?,
            physical_stores_collection_id: get_env_or_default(
                "APPWRITE_PHYSICAL_STORES_COLLECTION_ID",
                "physicalStores",
            ),
            virtual_stores_collection_id: get_env_or_default(
                "APPWRITE_VIRTUAL_STORES_COLLECTION_ID",
                "virtualStores",
            ),
            store_cache_ttl: Duration::from_secs(store_cache_ttl),
        })
    }

    /// Name of the cookie carrying the Appwrite session secret.
    #[must_use]
    pub fn session_cookie_name(&self) -> String {
        format!("a_session_{}", self.project_id)
    }

    /// Collection holding stores of `kind`.
    #[must_use]
    pub fn collection_for(&self, kind: StoreKind) -> &str {
        match kind {
            StoreKind::Physical => &self.physical_stores_collection_id,
            StoreKind::Virtual => &self.virtual_stores_collection_id,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a required absolute URL, normalized without a trailing slash.
fn get_url(key: &str) -> Result<String, ConfigError> {
    let raw = get_required_env(key)?;
    normalize_url(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

fn normalize_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn appwrite_config() -> AppwriteConfig {
        AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: "65f1c0a2e4b7d9c3a1f0".to_string(),
            api_key: SecretString::from("standard_9f8e7d6c5b4a"),
            database_id: "main".to_string(),
            physical_stores_collection_id: "physicalStores".to_string(),
            virtual_stores_collection_id: "virtualStores".to_string(),
            store_cache_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(matches!(
            validate_secret_strength("your-api-key-here", "KEY"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "KEY").is_err());
        assert!(validate_secret_strength("standard_4f1a9c0e7b3d82a65fe1", "KEY").is_ok());
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://cloud.appwrite.io/v1/").unwrap(),
            "https://cloud.appwrite.io/v1"
        );
        assert_eq!(
            normalize_url("http://localhost:3002").unwrap(),
            "http://localhost:3002"
        );
        assert!(normalize_url("ftp://files.example.com").is_err());
        assert!(normalize_url("not a url").is_err());
    }

    #[test]
    fn test_session_cookie_name_uses_project_id_verbatim() {
        assert_eq!(
            appwrite_config().session_cookie_name(),
            "a_session_65f1c0a2e4b7d9c3a1f0"
        );

        let mut config = appwrite_config();
        config.project_id = "BazaarMarket".to_string();
        assert_eq!(config.session_cookie_name(), "a_session_BazaarMarket");
    }

    #[test]
    fn test_collection_for_kind() {
        let config = appwrite_config();
        assert_eq!(config.collection_for(StoreKind::Physical), "physicalStores");
        assert_eq!(config.collection_for(StoreKind::Virtual), "virtualStores");
    }

    #[test]
    fn test_appwrite_config_debug_redacts_api_key() {
        let debug = format!("{:?}", appwrite_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("standard_9f8e7d6c5b4a"));
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_from_env_needs_only_appwrite_settings() {
        // SAFETY: no other test in this crate reads or writes these variables.
        unsafe {
            std::env::remove_var("DASHBOARD_BASE_URL");
            std::env::set_var("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1/");
            std::env::set_var("APPWRITE_PROJECT_ID", "65f1c0a2e4b7d9c3a1f0");
            std::env::set_var("APPWRITE_API_KEY", "standard_4f1a9c0e7b3d82a65fe1");
            std::env::set_var("APPWRITE_DATABASE_ID", "main");
        }

        let config = DashboardConfig::from_env().unwrap();
        assert_eq!(config.appwrite.endpoint, "https://cloud.appwrite.io/v1");
        assert_eq!(
            config.appwrite.session_cookie_name(),
            "a_session_65f1c0a2e4b7d9c3a1f0"
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = DashboardConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            appwrite: appwrite_config(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3002");
    }
}
