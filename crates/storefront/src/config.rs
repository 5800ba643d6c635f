//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Client ([`StorefrontConfig`])
//! - `LUMIERE_API_URL` - Commerce backend base URL (required)
//! - `LUMIERE_API_TIMEOUT_SECS` - Backend request timeout (default: 15)
//! - `LUMIERE_STOREFRONT_URL` - Public site URL used to build payment
//!   return/cancel URLs (default: `http://localhost:3000`)
//! - `LUMIERE_DATA_DIR` - Directory for the local and session stores
//!   (default: `.lumiere`)
//!
//! ## Glue server ([`ServerConfig`])
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHEETS_WEBHOOK_URL` - Google Sheets web app receiving form rows
//! - `SMTP_HOST`, `SMTP_PORT` (default 587), `SMTP_USERNAME`, `SMTP_PASSWORD`
//!   - mail relay; mail is disabled unless host, username and password are set
//! - `MAIL_FROM` - Sender address (default: `SMTP_USERNAME`)
//! - `MAIL_TO` - Recipient of contact form mail (default: `MAIL_FROM`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use lumiere_api::ApiConfig;
use lumiere_core::check_secret_strength;

const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3000";
const DEFAULT_DATA_DIR: &str = ".lumiere";

/// File name of the persistent store (auth token, user, cart).
pub const LOCAL_STORE_FILE: &str = "local.json";

/// File name of the session store (checkout correlation IDs).
pub const SESSION_STORE_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error(transparent)]
    Api(#[from] lumiere_api::ConfigError),
}

// =============================================================================
// Client configuration
// =============================================================================

/// Settings for the storefront client (cart, checkout, CLI).
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend connection.
    pub api: ApiConfig,
    /// Public site URL; PayOS sends customers back to paths under it.
    pub storefront_url: Url,
    /// Where the local and session stores live.
    pub data_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LUMIERE_API_URL` is missing or any variable
    /// is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let storefront_url = parse_url(
            "LUMIERE_STOREFRONT_URL",
            &get_env_or_default("LUMIERE_STOREFRONT_URL", DEFAULT_STOREFRONT_URL),
        )?;
        let data_dir = PathBuf::from(get_env_or_default("LUMIERE_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api,
            storefront_url,
            data_dir,
        })
    }

    /// Path of the persistent store.
    #[must_use]
    pub fn local_store_path(&self) -> PathBuf {
        self.data_dir.join(LOCAL_STORE_FILE)
    }

    /// Path of the session store.
    #[must_use]
    pub fn session_store_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_STORE_FILE)
    }

    /// Where PayOS sends the customer after a successful payment.
    #[must_use]
    pub fn payment_return_url(&self) -> String {
        self.site_url("payment/success")
    }

    /// Where PayOS sends the customer after cancelling.
    #[must_use]
    pub fn payment_cancel_url(&self) -> String {
        self.site_url("payment/cancel")
    }

    fn site_url(&self, path: &str) -> String {
        format!("{}/{path}", self.storefront_url.as_str().trim_end_matches('/'))
    }
}

// =============================================================================
// Glue server configuration
// =============================================================================

/// Settings for the form glue server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Google Sheets web app receiving order and interest rows
    pub sheets_webhook_url: Option<Url>,
    /// SMTP relay for contact mail
    pub mail: Option<MailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// SMTP relay settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    /// Sender address
    pub from_address: String,
    /// Recipient of contact form mail
    pub to_address: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the SMTP password
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let sheets_webhook_url = get_optional_env("SHEETS_WEBHOOK_URL")
            .map(|raw| parse_url("SHEETS_WEBHOOK_URL", &raw))
            .transpose()?;

        Ok(Self {
            host,
            port,
            sheets_webhook_url,
            mail: MailConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MailConfig {
    /// Load SMTP settings, or `None` when mail is not configured.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(smtp_host), Some(smtp_username)) =
            (get_optional_env("SMTP_HOST"), get_optional_env("SMTP_USERNAME"))
        else {
            return Ok(None);
        };

        let smtp_password = get_validated_secret("SMTP_PASSWORD")?;
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let from_address = get_optional_env("MAIL_FROM").unwrap_or_else(|| smtp_username.clone());
        let to_address = get_optional_env("MAIL_TO").unwrap_or_else(|| from_address.clone());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
            to_address,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    check_secret_strength(secret)
        .map_err(|e| ConfigError::InsecureSecret(var_name.to_string(), e.to_string()))
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
