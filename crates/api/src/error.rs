//! Errors returned by the API client and services.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use lumiere_core::ValidationError;

use crate::storage::StorageError;

/// Where the admin dashboard sends a user whose session expired.
pub const LOGIN_PATH: &str = "/admin/login";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The backend rejected the bearer token. The local session has already
    /// been cleared; the user must sign in again at `login_path`.
    #[error("Session expired, please sign in again")]
    Unauthorized {
        /// Login route to send the user to.
        login_path: &'static str,
    },

    /// The backend is throttling requests.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A success response did not match the expected shape.
    #[error("Failed to parse response from {path}: {source}")]
    Parse {
        /// Request path.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Local session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input was rejected before sending.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Message suitable for showing to the user.
    ///
    /// Backend-provided messages are passed through; transport failures are
    /// collapsed into a generic connectivity message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Self::Http(_) => "Could not reach the server. Check your connection.".to_string(),
            Self::Url(_) | Self::Parse { .. } => {
                "Unexpected response from the server.".to_string()
            }
            Self::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::RateLimited(secs) => {
                format!("Too many requests. Please wait {secs} seconds and try again.")
            }
            Self::Api { message, .. } => message.clone(),
            Self::Storage(e) => format!("Could not access local storage: {e}"),
            Self::Validation(e) => e.to_string(),
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether retrying the same request later could succeed.
    ///
    /// Network failures, 5xx responses and throttling are transient;
    /// validation, authorization and parse failures are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status >= 500,
            Self::RateLimited(_) => true,
            Self::Url(_)
            | Self::Unauthorized { .. }
            | Self::Parse { .. }
            | Self::Storage(_)
            | Self::Validation(_) => false,
        }
    }
}

/// Error body shape used by the backend:
/// `{"statusCode": 400, "message": "..." | ["...", "..."], "error": "Bad Request"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Pull a human-readable message out of an error response body.
///
/// Falls back to the body text when it is short plain text, and to the
/// status reason otherwise.
pub(crate) fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.message {
            Some(ErrorMessage::One(message)) if !message.trim().is_empty() => return message,
            Some(ErrorMessage::Many(messages)) if !messages.is_empty() => {
                return messages.join("; ");
            }
            _ => {}
        }
        if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
            return error;
        }
    }

    let trimmed = body.trim();
    let looks_like_text = !trimmed.starts_with('<') && !trimmed.starts_with('{');
    if !trimmed.is_empty() && trimmed.len() <= 200 && looks_like_text {
        return trimmed.to_string();
    }

    status.canonical_reason().map_or_else(
        || format!("Request failed with status {}", status.as_u16()),
        str::to_string,
    )
}
