//! Error handling for the form glue routes.
//!
//! Handlers return `Result<T, AppError>`. Server-side failures are captured
//! to Sentry before responding; every error answers with the JSON shape the
//! storefront forms expect: `{"success": false, "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{MailError, SheetsError};

/// Error type for the glue server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Appending to the spreadsheet failed.
    #[error("Sheets error: {0}")]
    Sheets(#[from] SheetsError),

    /// Sending mail failed.
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// An integration the route needs is not configured.
    #[error("Not configured: {0}")]
    Unavailable(&'static str),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Body of every form response.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Sheets(_) | Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Sheets(_) | Self::Mail(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if let Self::Unavailable(what) = &self {
            tracing::error!(integration = *what, "Integration not configured");
        }

        // Don't expose integration details to clients
        let message = match &self {
            Self::Sheets(_) | Self::Mail(_) => "Something went wrong. Please try again.".to_string(),
            Self::Unavailable(_) => "Service temporarily unavailable.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (
            self.status(),
            Json(FormResponse {
                success: false,
                message: Some(message),
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unavailable("mail").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Sheets(SheetsError::Rejected("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_message_is_shown() {
        let response = AppError::BadRequest("Name is required.".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
