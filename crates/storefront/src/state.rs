//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ServerConfig;
use crate::services::{MailError, Mailer, SheetsClient, SheetsError};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("sheets client: {0}")]
    Sheets(#[from] SheetsError),
    #[error("mailer: {0}")]
    Mail(#[from] MailError),
}

/// State shared by the glue routes.
///
/// Cheap to clone. Integrations left unconfigured are `None` and the routes
/// that need them answer `503`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    sheets: Option<SheetsClient>,
    mailer: Option<Mailer>,
}

impl AppState {
    /// Build the state and its integration clients.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured integration cannot be set up.
    pub fn new(config: ServerConfig) -> Result<Self, StateError> {
        let sheets = config
            .sheets_webhook_url
            .clone()
            .map(SheetsClient::new)
            .transpose()?;
        let mailer = config.mail.as_ref().map(Mailer::new).transpose()?;

        if sheets.is_none() {
            tracing::warn!("SHEETS_WEBHOOK_URL not set, order and interest forms disabled");
        }
        if mailer.is_none() {
            tracing::warn!("SMTP not configured, contact form disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sheets,
                mailer,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Sheets client, if configured.
    #[must_use]
    pub fn sheets(&self) -> Option<&SheetsClient> {
        self.inner.sheets.as_ref()
    }

    /// Mailer, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("sheets", &self.inner.sheets.is_some())
            .field("mailer", &self.inner.mailer.is_some())
            .finish()
    }
}
