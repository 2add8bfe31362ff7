//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `STOREFRONT_SESSION_DATABASE_URL` - `SQLite` URL for the session store
//!   (default: `sqlite://fakeshop-sessions.db?mode=rwc`)
//! - `STOREFRONT_SESSION_EXPIRY_DAYS` - Days of inactivity before a browser's
//!   cart and favorites are dropped (default: 365)
//! - `STOREFRONT_CONTACT_EMAIL` - Address for the navbar Contact link
//! - `CATALOG_BASE_URL` - Remote product catalog (default: `https://fakestoreapi.com`)
//! - `CATALOG_CACHE_TTL_SECS` - Product list cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";
const DEFAULT_CONTACT_EMAIL: &str = "hello@fakeshop.dev";

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session store and cookie settings
    pub session: SessionConfig,
    /// Remote catalog settings
    pub catalog: CatalogConfig,
    /// Address for the navbar Contact link
    pub contact_email: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced in Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Session store configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `SQLite` connection URL for the session store
    pub database_url: String,
    /// Inactivity period after which a session is dropped
    pub expiry: Duration,
}

/// Remote catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL without trailing slash; `/products` is appended for requests
    pub base_url: String,
    /// Lifetime of the cached product list
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            cache_ttl: Duration::from_secs(300),
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
    /// Returns `ConfigError` if a variable is set to a value that cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        let session = SessionConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            session,
            catalog,
            contact_email: get_env_or_default("STOREFRONT_CONTACT_EMAIL", DEFAULT_CONTACT_EMAIL),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session: SessionConfig {
                database_url: "sqlite://fakeshop-sessions.db?mode=rwc".to_string(),
                expiry: Duration::from_secs(365 * SECS_PER_DAY),
            },
            catalog: CatalogConfig::default(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let expiry_days =
            parse_env_or_default::<u64>("STOREFRONT_SESSION_EXPIRY_DAYS", "365")?;

        Ok(Self {
            database_url: get_env_or_default(
                "STOREFRONT_SESSION_DATABASE_URL",
                "sqlite://fakeshop-sessions.db?mode=rwc",
            ),
            expiry: session_expiry(expiry_days)?,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_catalog_url(&get_env_or_default("CATALOG_BASE_URL", DEFAULT_CATALOG_URL))?;
        let ttl_secs = parse_env_or_default::<u64>("CATALOG_CACHE_TTL_SECS", "300")?;

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// `n` days, or `None` if that many seconds overflow.
const fn days(n: u64) -> Option<Duration> {
    match n.checked_mul(SECS_PER_DAY) {
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    }
}

/// Session inactivity expiry from a day count.
fn session_expiry(expiry_days: u64) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar(
            "STOREFRONT_SESSION_EXPIRY_DAYS".to_string(),
            reason.to_string(),
        )
    };

    if expiry_days == 0 {
        return Err(invalid("must be at least 1"));
    }
    days(expiry_days).ok_or_else(|| invalid("too large"))
}

/// Validate the catalog base URL and strip any trailing slash.
fn parse_catalog_url(value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
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
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
