//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GREEN_EARTH_API_BASE` - Catalog API base URL (default: <https://openapi.programming-hero.com/api>)
//! - `GREEN_EARTH_HOST` - Bind address (default: 127.0.0.1)
//! - `GREEN_EARTH_PORT` - Listen port (default: 3000)
//! - `GREEN_EARTH_DATA_DIR` - Directory for the persistent cart slot (default: `data`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Catalog API used when `GREEN_EARTH_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "https://openapi.programming-hero.com/api";

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
    /// Remote catalog API configuration
    pub catalog: CatalogConfig,
    /// Directory holding the file-backed key-value store
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL that endpoint paths are appended to.
    pub api_base: Url,
}

impl CatalogConfig {
    /// Build a catalog configuration from a raw base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is not
    /// http(s).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |msg: String| ConfigError::InvalidEnvVar("GREEN_EARTH_API_BASE".into(), msg);

        let api_base = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "scheme must be http or https (got {})",
                api_base.scheme()
            )));
        }
        if api_base.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        Ok(Self { api_base })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var::<IpAddr>("GREEN_EARTH_HOST", &get_or("GREEN_EARTH_HOST", "127.0.0.1"))?;
        let port = parse_var::<u16>("GREEN_EARTH_PORT", &get_or("GREEN_EARTH_PORT", "3000"))?;
        let catalog = CatalogConfig::parse(&get_or("GREEN_EARTH_API_BASE", DEFAULT_API_BASE))?;
        let data_dir = PathBuf::from(get_or("GREEN_EARTH_DATA_DIR", "data"));

        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.trim().is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT").filter(|v| !v.trim().is_empty());
        let sentry_sample_rate =
            parse_rate("SENTRY_SAMPLE_RATE", &get_or("SENTRY_SAMPLE_RATE", "1.0"))?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &get_or("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
        )?;

        Ok(Self {
            host,
            port,
            catalog,
            data_dir,
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

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable on failure.
fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies within `0.0..=1.0`.
fn parse_rate(key: &str, value: &str) -> Result<f32, ConfigError> {
    let rate = parse_var::<f32>(key, value)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
