//! Form glue routes with a mock Sheets web app.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lumiere_storefront::config::ServerConfig;
use lumiere_storefront::routes::router;
use lumiere_storefront::state::AppState;

fn config(sheets: Option<&MockServer>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        sheets_webhook_url: sheets.map(|s| Url::parse(&s.uri()).unwrap()),
        mail: None,
        sentry_dsn: None,
    }
}

async fn post(state: AppState, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// /api/submit-interest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn interest_is_appended_to_sheet() {
    let sheets = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "sheet": "interest",
            "name": "Nguyen Lan",
            "email": "lan@example.com",
            "product": "Serum"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
        .expect(1)
        .mount(&sheets)
        .await;

    let state = AppState::new(config(Some(&sheets))).unwrap();
    let (status, body) = post(
        state,
        "/api/submit-interest",
        &json!({"name": " Nguyen Lan ", "email": "Lan@Example.com", "product": "Serum", "phone": " "}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn interest_with_bad_email_is_rejected() {
    let sheets = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sheets)
        .await;

    let state = AppState::new(config(Some(&sheets))).unwrap();
    let (status, body) = post(
        state,
        "/api/submit-interest",
        &json!({"name": "Lan", "email": "lan@"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Please enter a valid email address."));
}

#[tokio::test]
async fn sheets_failure_is_a_server_error() {
    let sheets = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&sheets)
        .await;

    let state = AppState::new(config(Some(&sheets))).unwrap();
    let (status, body) = post(
        state,
        "/api/submit-interest",
        &json!({"name": "Lan", "email": "lan@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Something went wrong. Please try again."));
}

// ---------------------------------------------------------------------------
// /api/save-order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_summary_is_appended_to_sheet() {
    let sheets = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "sheet": "orders",
            "orderId": "o1",
            "customerEmail": "lan@example.com",
            "total": 250_000.0,
            "items": [{"name": "Serum", "quantity": 2, "price": 100_000.0}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
        .expect(1)
        .mount(&sheets)
        .await;

    let state = AppState::new(config(Some(&sheets))).unwrap();
    let (status, _) = post(
        state,
        "/api/save-order",
        &json!({
            "orderId": "o1",
            "customerName": "Nguyen Lan",
            "customerEmail": "lan@example.com",
            "total": 250_000,
            "paymentMethod": "cod",
            "items": [{"name": "Serum", "quantity": 2, "price": 100_000}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn save_order_without_sheets_is_unavailable() {
    let state = AppState::new(config(None)).unwrap();
    let (status, body) = post(
        state,
        "/api/save-order",
        &json!({
            "orderId": "o1",
            "customerName": "Lan",
            "customerEmail": "lan@example.com",
            "total": 1000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
}

// ---------------------------------------------------------------------------
// /api/sendmail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sendmail_without_smtp_is_unavailable() {
    let state = AppState::new(config(None)).unwrap();
    let (status, body) = post(
        state,
        "/api/sendmail",
        &json!({"name": "Lan", "email": "lan@example.com", "message": "Hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], json!("Service temporarily unavailable."));
}

#[tokio::test]
async fn sendmail_requires_message() {
    let state = AppState::new(config(None)).unwrap();
    let (status, body) = post(
        state,
        "/api/sendmail",
        &json!({"name": "Lan", "email": "lan@example.com", "message": "  "}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Name and message are required."));
}

#[tokio::test]
async fn health_is_ok() {
    let state = AppState::new(config(None)).unwrap();
    let response = router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
