//! Orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{
    OrderId, OrderStatus, PaymentMethod, PaymentStatus, Price, ProductId, UserId,
};

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: u32,
    /// Unit price charged.
    pub price: Price,
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-facing order number, when the backend assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Reference to show the customer: the order code if any, else the ID.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.order_code.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// A line of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price the customer saw; the backend re-prices authoritatively.
    pub price: Price,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Referral code of the mentor credited with the sale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of `PATCH /orders/:id/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Query string of `GET /orders`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
