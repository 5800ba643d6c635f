//! Domain services against a mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lumiere_api::models::{CommissionInput, CreatePaymentRequest, OrderQuery, ReportRange};
use lumiere_api::services::auth::Registration;
use lumiere_api::services::{
    AuthService, CommissionService, OrderService, PaymentService, ProductService, ReportService,
};
use lumiere_api::{ApiClient, ApiConfig, ApiError, AuthSession, MemoryStore};
use lumiere_core::{
    CommissionId, CommissionSplit, OrderId, OrderStatus, PaymentOrderCode, PaymentStatus, Price,
    ProductId, RevenuePeriod, UserRole, ValidationError,
};

fn client(server: &MockServer) -> ApiClient {
    let session = AuthSession::new(Arc::new(MemoryStore::new()));
    ApiClient::new(&ApiConfig::new(&server.uri()).unwrap(), session).unwrap()
}

fn user_json(role: &str) -> serde_json::Value {
    json!({"id": 7, "email": "lan@example.com", "fullName": "Nguyen Lan", "role": role})
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_stores_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"email": "lan@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "jwt",
            "user": user_json("admin")
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = AuthService::new(client.clone());
    let user = auth.login("lan@example.com", "secret1").await.unwrap();

    assert_eq!(user.role, UserRole::Admin);
    assert!(client.session().is_authenticated());
    assert!(client.session().is_admin());
    assert_eq!(auth.current_user().unwrap().full_name, "Nguyen Lan");

    auth.logout();
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn login_failure_leaves_session_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = AuthService::new(client.clone())
        .login("lan@example.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn register_validates_before_sending() {
    let server = MockServer::start().await;
    let auth = AuthService::new(client(&server));

    let err = auth
        .register(&Registration {
            email: "lan@example.com".to_string(),
            password: "123".to_string(),
            full_name: "Lan".to_string(),
            ..Registration::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::TooShort { field: "password", .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_list_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p1", "name": "Serum", "price": 100000},
            {"id": "p2", "name": "Toner", "price": 50000}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let products = ProductService::new(client(&server));
    assert_eq!(products.list().await.unwrap().len(), 2);
    assert_eq!(products.list().await.unwrap().len(), 2);

    products.invalidate();
    assert_eq!(products.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn product_get_escapes_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Serum", "price": 100000})),
        )
        .mount(&server)
        .await;

    let product = ProductService::new(client(&server))
        .get(&ProductId::new("p1"))
        .await
        .unwrap();
    assert_eq!(product.price, Price::from_dong(100_000));
}

// ---------------------------------------------------------------------------
// Orders and payments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_list_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("status", "pending"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "o1", "totalAmount": 250000, "status": "pending", "paymentMethod": "cod"}],
            "total": 11
        })))
        .mount(&server)
        .await;

    let orders = OrderService::new(client(&server))
        .list(&OrderQuery {
            status: Some(OrderStatus::Pending),
            page: Some(2),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_amount, Price::from_dong(250_000));
}

#[tokio::test]
async fn update_status_patches_order() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/orders/o1/status"))
        .and(body_partial_json(json!({"status": "shipping"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "o1", "totalAmount": 250000, "status": "shipping", "paymentMethod": "online"
        })))
        .mount(&server)
        .await;

    let order = OrderService::new(client(&server))
        .update_status(&OrderId::new("o1"), OrderStatus::Shipping)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipping);
}

#[tokio::test]
async fn payment_link_and_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .and(body_partial_json(json!({
            "orderId": "o1",
            "returnUrl": "http://shop.test/payment/success"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "checkoutUrl": "https://pay.payos.vn/web/abc",
            "paymentId": "pay_1",
            "orderCode": 123456
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payments/info/123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderCode": 123456, "amount": 250000, "amountPaid": 250000,
            "amountRemaining": 0, "status": "PAID"
        })))
        .mount(&server)
        .await;

    let payments = PaymentService::new(client(&server));
    let link = payments
        .create_payment_link(&CreatePaymentRequest {
            order_id: OrderId::new("o1"),
            amount: Price::from_dong(250_000),
            description: None,
            return_url: "http://shop.test/payment/success".to_string(),
            cancel_url: "http://shop.test/payment/cancel".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(link.order_code, PaymentOrderCode::new("123456"));

    let info = payments.payment_info(&link.order_code).await.unwrap();
    assert_eq!(info.status, PaymentStatus::Paid);
    assert!(info.is_paid());
}

// ---------------------------------------------------------------------------
// Commissions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unbalanced_commission_is_never_sent() {
    let server = MockServer::start().await;
    let commissions = CommissionService::new(client(&server));

    let err = commissions
        .create(&CommissionInput {
            name: "Launch".to_string(),
            split: CommissionSplit::from_whole(12, 20, 10, 6, 3),
            description: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::CommissionTotal { .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn balanced_commission_is_created_and_activated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/commissions"))
        .and(body_partial_json(json!({"name": "Launch", "companyPercent": 12.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "name": "Launch", "companyPercent": 12, "vipPercent": 20,
            "mentorPercent": 10, "menteePercent": 6, "loyaltyPercent": 2, "isActive": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/commissions/3/activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "activated"})))
        .expect(1)
        .mount(&server)
        .await;

    let commissions = CommissionService::new(client(&server));
    let created = commissions
        .create(&CommissionInput {
            name: "Launch".to_string(),
            split: CommissionSplit::from_whole(12, 20, 10, 6, 2),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, CommissionId::new("3"));

    commissions.activate(&created.id).await.unwrap();
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn revenue_sends_group_by() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/revenue"))
        .and(query_param("groupBy", "month"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"period": "2026-09", "revenue": 1500000, "orders": 6}
        ])))
        .mount(&server)
        .await;

    let points = ReportService::new(client(&server))
        .revenue(&ReportRange {
            period: Some(RevenuePeriod::Month),
            ..ReportRange::default()
        })
        .await
        .unwrap();
    assert_eq!(points[0].revenue, Price::from_dong(1_500_000));
}
