//! Google Sheets web app client.
//!
//! The spreadsheet side is an Apps Script web app that appends every posted
//! JSON object as a row of the sheet named in its `sheet` field. It answers
//! `{"result": "success"}` or `{"result": "error", "error": "..."}`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Target sheet of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sheet {
    Orders,
    Interest,
}

/// Errors that can occur when appending a row.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The web app returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The web app accepted the request but reported a failure.
    #[error("Sheet rejected row: {0}")]
    Rejected(String),
}

/// Client for the Sheets web app.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    webhook_url: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a, T: Serialize> {
    sheet: Sheet,
    submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    data: &'a T,
}

#[derive(Debug, Default, Deserialize)]
struct AppsScriptReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SheetsClient {
    /// Create a new client posting to `webhook_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(webhook_url: Url) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Append `data` as a row of `sheet`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the web app reports an error.
    pub async fn append<T: Serialize + Sync>(&self, sheet: Sheet, data: &T) -> Result<(), SheetsError> {
        let row = Row {
            sheet,
            submitted_at: Utc::now(),
            data,
        };

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&row)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        // Apps Script sometimes answers with an HTML page; only a JSON error
        // reply counts as a failure.
        let reply: AppsScriptReply = serde_json::from_str(&body).unwrap_or_default();
        if reply.result.as_deref() == Some("error") {
            return Err(SheetsError::Rejected(
                reply.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        tracing::info!(sheet = ?sheet, "Row appended to sheet");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_append_posts_tagged_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"sheet": "interest", "name": "Lan"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SheetsClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        client
            .append(Sheet::Interest, &json!({"name": "Lan"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_script_error_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "error", "error": "sheet not found"})),
            )
            .mount(&server)
            .await;

        let client = SheetsClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let err = client
            .append(Sheet::Orders, &json!({"orderId": "o1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::Rejected(ref m) if m == "sheet not found"));
    }

    #[tokio::test]
    async fn test_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = SheetsClient::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let err = client
            .append(Sheet::Orders, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::Api { status: 500, .. }));
    }
}
