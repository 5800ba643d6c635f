//! PayOS payment links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{OrderId, PaymentId, PaymentOrderCode, PaymentStatus, Price};

/// Body of `POST /payments/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: OrderId,
    pub amount: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the gateway sends the customer after paying.
    pub return_url: String,
    /// Where the gateway sends the customer after cancelling.
    pub cancel_url: String,
}

/// Response of `POST /payments/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    /// Hosted checkout page to redirect the customer to.
    pub checkout_url: String,
    pub payment_id: PaymentId,
    /// Gateway-side order code used to look the payment up later.
    pub order_code: PaymentOrderCode,
}

/// A bank transfer matched to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    #[serde(default)]
    pub reference: String,
    pub amount: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date_time: Option<String>,
}

/// Response of `GET /payments/info/:orderCode` and
/// `POST /payments/cancel/:orderCode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub order_code: PaymentOrderCode,
    pub amount: Price,
    #[serde(default)]
    pub amount_paid: Price,
    #[serde(default)]
    pub amount_remaining: Price,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub transactions: Vec<PaymentTransaction>,
}

impl PaymentInfo {
    /// Whether the full amount has been received.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// Body of `POST /payments/cancel/:orderCode`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}
