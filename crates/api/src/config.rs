//! API client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUMIERE_API_URL` - Base URL of the commerce backend (e.g. `https://api.lumiere.vn/api`)
//!
//! ## Optional
//! - `LUMIERE_API_TIMEOUT_SECS` - Per-request timeout (default: 15)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against. Always ends in `/`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ApiConfig {
    /// Build a configuration for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed or is
    /// not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("LUMIERE_API_URL", base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LUMIERE_API_URL` is missing or any variable
    /// is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_url = std::env::var("LUMIERE_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("LUMIERE_API_URL".to_string()))?;
        let timeout_secs = std::env::var("LUMIERE_API_TIMEOUT_SECS")
            .ok()
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("LUMIERE_API_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url: parse_base_url("LUMIERE_API_URL", &raw_url)?,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: default_user_agent(),
        })
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_user_agent() -> String {
    format!("lumiere-api/{}", env!("CARGO_PKG_VERSION"))
}

/// Parse a base URL and make sure it ends with `/` so relative joins keep
/// any path prefix (`https://host/api` + `orders` → `https://host/api/orders`).
fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(var.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
