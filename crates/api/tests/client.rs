//! `ApiClient` behaviour against a mock backend.
//!
//! Covers header attachment, error unwrapping and the 401 sign-out path.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lumiere_api::error::LOGIN_PATH;
use lumiere_api::storage::keys;
use lumiere_api::{ApiClient, ApiConfig, ApiError, AuthSession, KeyValueStore, MemoryStore};

fn client_with_store(server: &MockServer) -> (ApiClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let session = AuthSession::new(store.clone());
    let config = ApiConfig::new(&server.uri()).unwrap();
    (ApiClient::new(&config, session).unwrap(), store)
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attaches_bearer_token_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/my-orders"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(header_exists("X-Request-Id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_with_store(&server);
    store.set(keys::AUTH_TOKEN, "tok-123").unwrap();

    let orders: Vec<Value> = client.get("orders/my-orders").await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn omits_authorization_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (client, _store) = client_with_store(&server);
    let _: Vec<Value> = client.get("products").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"statusCode": 401, "message": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let (client, store) = client_with_store(&server);
    store.set(keys::AUTH_TOKEN, "expired").unwrap();
    store
        .set(keys::CURRENT_USER, r#"{"id":1,"email":"a@b.vn","role":"admin"}"#)
        .unwrap();
    store.set(keys::CART, "[]").unwrap();

    let err = client.get::<Vec<Value>>("users").await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Unauthorized { login_path } if login_path == LOGIN_PATH
    ));
    assert_eq!(store.get(keys::AUTH_TOKEN).unwrap(), None);
    assert_eq!(store.get(keys::CURRENT_USER).unwrap(), None);
    // Only the session is dropped, not the cart
    assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn backend_message_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["customerPhone should not be empty", "items must not be empty"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let (client, _store) = client_with_store(&server);
    let err = client
        .post::<Value, _>("orders", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "customerPhone should not be empty; items must not be empty"
    );
}

#[tokio::test]
async fn rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/dashboard"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let (client, _store) = client_with_store(&server);
    let err = client.get::<Value>("reports/dashboard").await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited(7)));
}

#[tokio::test]
async fn empty_success_body_is_unit() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (client, _store) = client_with_store(&server);
    let result: Option<Value> = client.delete("users/9").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (client, _store) = client_with_store(&server);
    let err = client.get::<Value>("products/1").await.unwrap_err();
    assert!(matches!(err, ApiError::Parse { ref path, .. } if path == "products/1"));
}
