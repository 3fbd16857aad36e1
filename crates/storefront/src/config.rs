//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_HOST` - Bind address (default: 127.0.0.1)
//! - `CART_PORT` - Listen port (default: 3000)
//! - `CART_STORAGE_PATH` - Local storage document (default: .cartview/local-storage.json)
//! - `CART_CATALOG_URL` - Product catalog endpoint (default: <https://dummyjson.com/products>)
//! - `CART_PAGE_IDLE_SECS` - Seconds an idle cart page keeps its row state (default: 1800)
//! - `CART_PAGE_CAPACITY` - Maximum number of cart pages kept at once (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

/// Default location of the local storage document.
pub const DEFAULT_STORAGE_PATH: &str = ".cartview/local-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path of the local storage document holding the cart
    pub storage_path: PathBuf,
    /// Product catalog configuration
    pub catalog: CatalogConfig,
    /// Retention of per-page row state
    pub pages: PageRegistryConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning the full product collection
    pub endpoint: Url,
}

/// How long loaded cart pages keep their row state.
#[derive(Debug, Clone, Copy)]
pub struct PageRegistryConfig {
    /// Pages untouched for this long are dropped
    pub time_to_idle: Duration,
    /// Upper bound on retained pages
    pub max_capacity: u64,
}

impl Default for PageRegistryConfig {
    fn default() -> Self {
        Self {
            time_to_idle: Duration::from_secs(30 * 60),
            max_capacity: 1000,
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&get, "CART_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&get, "CART_PORT", 3000_u16)?;
        let storage_path = get("CART_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        let catalog = CatalogConfig::from_source(&get)?;
        let pages = PageRegistryConfig::from_source(&get)?;

        Ok(Self {
            host,
            port,
            storage_path,
            catalog,
            pages,
            sentry_dsn: get("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_source(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = get("CART_CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        Ok(Self {
            endpoint: parse_catalog_url(&raw)?,
        })
    }
}

impl PageRegistryConfig {
    fn from_source(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let idle_secs = parse_or_default(get, "CART_PAGE_IDLE_SECS", defaults.time_to_idle.as_secs())?;
        let max_capacity = parse_or_default(get, "CART_PAGE_CAPACITY", defaults.max_capacity)?;
        Ok(Self {
            time_to_idle: Duration::from_secs(idle_secs),
            max_capacity,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn parse_or_default<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse and validate the catalog endpoint.
///
/// The catalog is only ever reached over HTTP(S).
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if `raw` is not an absolute
/// `http`/`https` URL.
pub fn parse_catalog_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("CART_CATALOG_URL".to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "CART_CATALOG_URL".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}
