//! Cart to order to payment, with state kept on disk between steps.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use lumiere_api::services::{AuthService, OrderService};
use lumiere_api::storage::keys;
use lumiere_api::ApiError;
use lumiere_core::{PaymentMethod, PaymentStatus, Price};
use lumiere_integration_tests::{RETURN_URL, TestContext, auth_json, product};
use lumiere_storefront::checkout::{CheckoutError, CheckoutForm, CheckoutOutcome};

fn form() -> CheckoutForm {
    CheckoutForm {
        name: "Nguyen Lan".to_string(),
        email: "lan@example.com".to_string(),
        phone: "+84 901 234 567".to_string(),
        address: "12 Le Loi, District 1, HCMC".to_string(),
        ..CheckoutForm::default()
    }
}

fn order_json(payment_method: &str) -> serde_json::Value {
    json!({
        "id": "o-42",
        "totalAmount": 250_000,
        "status": "pending",
        "paymentMethod": payment_method,
        "customerName": "Nguyen Lan",
        "customerEmail": "lan@example.com",
        "items": [
            {"productId": "p1", "quantity": 2, "price": 100_000},
            {"productId": "p2", "quantity": 1, "price": 50_000}
        ]
    })
}

/// Fill the cart the way an earlier process would have.
fn fill_cart(ctx: &TestContext) {
    let cart = ctx.cart().unwrap();
    cart.add(product("p1", "Serum", 100_000).unwrap(), 1).unwrap();
    cart.add(product("p1", "Serum", 100_000).unwrap(), 1).unwrap();
    cart.add(product("p2", "Cream", 50_000).unwrap(), 1).unwrap();
}

// ---------------------------------------------------------------------------
// Cash on delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cod_checkout_persists_across_processes() {
    let ctx = TestContext::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({"paymentMethod": "cod", "customerPhone": "+84901234567"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json("cod")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    fill_cart(&ctx);

    // A new process sees the cart from disk.
    let cart = ctx.cart().unwrap();
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), Price::from_dong(250_000));

    let flow = ctx.checkout(&cart).unwrap();
    let outcome = flow.submit(&form(), PaymentMethod::Cod).await.unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Completed { .. }));

    // And a later one sees the empty cart and the order summary.
    assert!(ctx.cart().unwrap().is_empty());
    let summary = ctx.payment_return().unwrap().last_order().unwrap();
    assert_eq!(summary.order_id.as_str(), "o-42");
    assert_eq!(summary.total, Price::from_dong(250_000));
}

// ---------------------------------------------------------------------------
// Online payment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn online_checkout_then_payment_return() {
    let ctx = TestContext::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json("online")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .and(body_partial_json(json!({"orderId": "o-42", "returnUrl": RETURN_URL})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "checkoutUrl": "https://pay.payos.vn/web/xyz",
            "paymentId": "pay_9",
            "orderCode": 987_654
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payments/info/987654"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderCode": 987_654, "amount": 250_000, "amountPaid": 250_000,
            "amountRemaining": 0, "status": "PAID"
        })))
        .mount(&ctx.server)
        .await;

    fill_cart(&ctx);
    let cart = ctx.cart().unwrap();
    let outcome = ctx
        .checkout(&cart)
        .unwrap()
        .submit(&form(), PaymentMethod::Online)
        .await
        .unwrap();

    let CheckoutOutcome::Redirect { checkout_url, .. } = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(checkout_url, "https://pay.payos.vn/web/xyz");
    assert!(ctx.cart().unwrap().is_empty());

    // The customer comes back in a new process.
    let payment_return = ctx.payment_return().unwrap();
    let pending = payment_return.pending().unwrap().unwrap();
    assert_eq!(pending.order_code.as_str(), "987654");
    assert_eq!(pending.order_id.unwrap().as_str(), "o-42");

    let info = payment_return.reconcile().await.unwrap().unwrap();
    assert_eq!(info.status, PaymentStatus::Paid);
    assert!(ctx.session().unwrap().get(keys::PAYMENT_ORDER_CODE).unwrap().is_none());
    assert!(ctx.session().unwrap().get(keys::ORDER_ID).unwrap().is_none());
}

#[tokio::test]
async fn payment_link_failure_keeps_cart_on_disk() {
    let ctx = TestContext::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_json("online")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "PayOS config missing"})))
        .mount(&ctx.server)
        .await;

    fill_cart(&ctx);
    let cart = ctx.cart().unwrap();
    let err = ctx
        .checkout(&cart)
        .unwrap()
        .submit(&form(), PaymentMethod::Online)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::PaymentLink { .. }));
    assert_eq!(err.user_message(), "PayOS config missing");
    assert_eq!(ctx.cart().unwrap().item_count(), 3);
    assert!(ctx.payment_return().unwrap().pending().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Session expiry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn expired_token_signs_out_but_keeps_cart() {
    let ctx = TestContext::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(auth_json("user")))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/my-orders"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    AuthService::new(ctx.client().unwrap())
        .login("lan@example.com", "secret1")
        .await
        .unwrap();
    fill_cart(&ctx);

    // Next process: token is read back from disk and rejected.
    let client = ctx.client().unwrap();
    assert!(client.session().is_authenticated());
    let err = OrderService::new(client).my_orders().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { login_path: "/admin/login" }));
    let client = ctx.client().unwrap();
    assert!(!client.session().is_authenticated());
    assert!(client.session().current_user().is_none());
    assert_eq!(ctx.cart().unwrap().item_count(), 3);
}
