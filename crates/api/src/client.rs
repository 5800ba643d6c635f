//! Shared HTTP client for the commerce backend.
//!
//! Every service wraps an [`ApiClient`]. The client resolves endpoint paths
//! against the configured base URL, attaches the bearer token from the
//! [`AuthSession`] when one is present, and turns non-success responses into
//! [`ApiError`]s:
//!
//! - `401` clears the local session and yields [`ApiError::Unauthorized`]
//! - `429` yields [`ApiError::RateLimited`] with the `Retry-After` delay
//! - anything else non-2xx yields [`ApiError::Api`] with the backend message

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, LOGIN_PATH, extract_error_message};
use crate::session::AuthSession;

/// Header carrying a per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the commerce backend REST API.
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: AuthSession,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: AuthSession) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// Base URL endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path such as `orders/my` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not form a valid URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `GET path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path)?;
        self.send(path, request).await
    }

    /// `GET path?query` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(path, request).await
    }

    /// `POST path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(path, request).await
    }

    /// `POST path` without a body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path)?;
        self.send(path, request).await
    }

    /// `PATCH path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.send(path, request).await
    }

    /// `PATCH path` without a body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::PATCH, path)?;
        self.send(path, request).await
    }

    /// `DELETE path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient`] for the error mapping.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::DELETE, path)?;
        self.send(path, request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut request = self
            .inner
            .http
            .request(method, url)
            .header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string());

        if let Some(token) = self.inner.session.token() {
            request = request.bearer_auth(token.expose_secret());
        }
        Ok(request)
    }

    #[instrument(skip(self, request), fields(path = %path))]
    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected the session token, signing out");
            self.inner.session.clear();
            return Err(ApiError::Unauthorized {
                login_path: LOGIN_PATH,
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(status, &body),
            });
        }

        debug!(status = %status, bytes = body.len(), "Backend response");

        // Some endpoints answer 200/204 with no body at all
        let body = if body.trim().is_empty() { "null" } else { &body };

        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse {
                path: path.to_string(),
                source: e,
            }
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Percent-encode a value for use as a single path segment.
#[must_use]
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
