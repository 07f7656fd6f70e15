//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## API server (all optional)
//! - `BAZAAR_HOST` - Bind address (default: 127.0.0.1)
//! - `BAZAAR_PORT` - Listen port (default: 3000)
//! - `BAZAAR_CATALOG_SIZE` - Number of generated products (default: 520)
//! - `BAZAAR_SESSION_IDLE_SECS` - Idle time before a session's cart,
//!   wishlist, and orders are dropped (default: 7 days)
//!
//! ## Client (all optional)
//! - `BAZAAR_API_BASE_URL` - Remote API root; absent means the in-memory shop
//! - `BAZAAR_SESSION_FILE` - Where the session id is persisted (default: `.bazaar_session`)
//! - `BAZAAR_SEARCH_DEBOUNCE_MS` - Search quiescence window (default: 300)
//! - `BAZAAR_BUDGET_LIMIT` - Initial budget limit in rupees (default: 30000)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bazaar_core::Price;
use thiserror::Error;
use url::Url;

use crate::catalog::DEFAULT_CATALOG_SIZE;

const DEFAULT_SESSION_IDLE_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_BUDGET_LIMIT: u32 = 30_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Number of products the seeded catalog holds
    pub catalog_size: usize,
    /// Idle expiry for per-session shop state
    pub session_idle: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            catalog_size: DEFAULT_CATALOG_SIZE,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or_default("BAZAAR_HOST", "127.0.0.1")?,
            port: parse_env_or_default("BAZAAR_PORT", "3000")?,
            catalog_size: parse_env_or_default(
                "BAZAAR_CATALOG_SIZE",
                &DEFAULT_CATALOG_SIZE.to_string(),
            )?,
            session_idle: Duration::from_secs(parse_env_or_default(
                "BAZAAR_SESSION_IDLE_SECS",
                &DEFAULT_SESSION_IDLE_SECS.to_string(),
            )?),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Shop client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote API root. `None` runs the in-memory shop.
    pub api_base_url: Option<Url>,
    /// File holding the persisted session id
    pub session_file: PathBuf,
    /// Quiescence window before a search edit triggers a refresh
    pub search_debounce: Duration,
    /// Initial budget limit
    pub budget_limit: Price,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            session_file: PathBuf::from(".bazaar_session"),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            budget_limit: Price::from_rupees(DEFAULT_BUDGET_LIMIT),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_base_url = get_optional_env("BAZAAR_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_base_url(&value))
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_API_BASE_URL".to_string(), e))?;

        let budget_rupees: u32 =
            parse_env_or_default("BAZAAR_BUDGET_LIMIT", &DEFAULT_BUDGET_LIMIT.to_string())?;

        Ok(Self {
            api_base_url,
            session_file: PathBuf::from(get_env_or_default(
                "BAZAAR_SESSION_FILE",
                ".bazaar_session",
            )),
            search_debounce: Duration::from_millis(parse_env_or_default(
                "BAZAAR_SEARCH_DEBOUNCE_MS",
                &DEFAULT_DEBOUNCE_MS.to_string(),
            )?),
            budget_limit: Price::from_rupees(budget_rupees),
        })
    }
}

/// Parse an API base URL, making sure it ends with `/` so relative joins keep
/// any path prefix (`http://host/shop/` + `api/products`).
///
/// # Errors
///
/// Returns a description of the parse failure.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| e.to_string())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_defaults() {
        let server = StorefrontConfig::default();
        assert_eq!(server.port, 3000);
        assert_eq!(server.catalog_size, 520);

        let client = ClientConfig::default();
        assert!(client.api_base_url.is_none());
        assert_eq!(client.search_debounce, Duration::from_millis(300));
        assert_eq!(client.budget_limit, Price::from_rupees(30_000));
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("http://localhost:3000/shop").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/shop/");
        assert_eq!(
            url.join("api/products").unwrap().as_str(),
            "http://localhost:3000/shop/api/products"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_env_or_default_uses_default() {
        let port: u16 = parse_env_or_default("BAZAAR_TEST_UNSET_PORT_VAR", "4000").unwrap();
        assert_eq!(port, 4000);
    }

    #[test]
    fn test_parse_env_or_default_reports_invalid_default() {
        let result: Result<u16, _> = parse_env_or_default("BAZAAR_TEST_UNSET_PORT_VAR", "nope");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
