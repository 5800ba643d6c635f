//! Checkout: form validation, order submission and the PayOS handoff.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──order created──▶ OrderCreated
//!                      │                              │
//!                      │ error                 COD ───┼─── online
//!                      ▼                       ▼             ▼
//!                    Idle                  Completed     Redirecting
//! ```
//!
//! Cash-on-delivery orders finish locally: the cart is cleared and a summary
//! is stashed for the success page. Online orders ask the backend for a PayOS
//! payment link, stash the correlation IDs for the return page, clear the
//! cart and hand the checkout URL back to the caller. If the link cannot be
//! created the cart is kept and the flow returns to `Idle` so the customer
//! can try again.

mod flow;
mod form;
mod payment_return;

pub use flow::{CheckoutFlow, CheckoutOutcome, CheckoutState, ReturnUrls};
pub use form::{CheckoutForm, FieldErrors, ValidCheckout};
pub use payment_return::{PaymentReturn, PendingPayment};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lumiere_api::models::Order;
use lumiere_api::{ApiError, StorageError};
use lumiere_core::{OrderId, PaymentMethod, Price};

use crate::cart::{CartError, CartItem, SHIPPING_FEE, cart_total};

/// Subtotal, shipping and total shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CheckoutSummary {
    /// Summarize `items` with the fixed shipping fee.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        let subtotal = cart_total(items);
        Self {
            subtotal,
            shipping: SHIPPING_FEE,
            total: subtotal + SHIPPING_FEE,
        }
    }
}

/// What the success page shows after a cash-on-delivery order, stored in the
/// session under `lastOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    /// Order code if the backend assigned one, else the ID.
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total: Price,
    pub item_count: u32,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Summarize a freshly created order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            reference: order.reference().to_string(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            total: order.total_amount,
            item_count: order.item_count(),
            payment_method: order.payment_method,
            placed_at: order.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Errors returned by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Another submit is still running.
    #[error("an order is already being submitted")]
    InFlight,

    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// The form has invalid fields.
    #[error("please fix the highlighted fields: {0}")]
    Invalid(#[from] FieldErrors),

    /// The backend rejected the order.
    #[error("could not place order: {0}")]
    Order(#[source] ApiError),

    /// The order exists but no payment link could be created. The cart is
    /// unchanged.
    #[error("could not start online payment for order {order_id}: {source}")]
    PaymentLink {
        order_id: OrderId,
        #[source]
        source: ApiError,
    },

    /// A payment lookup or cancel call failed.
    #[error("payment request failed: {0}")]
    Payment(#[source] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl CheckoutError {
    /// Message suitable for showing next to the submit button.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Order(e) | Self::Payment(e) | Self::PaymentLink { source: e, .. } => {
                e.user_message()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_api::models::Product;
    use lumiere_core::ProductId;

    #[test]
    fn test_summary_of_example_cart() {
        let item = |id: &str, price: i64, quantity: u32| CartItem {
            product: Product {
                id: ProductId::new(id),
                name: id.to_string(),
                price: Price::from_dong(price),
                original_price: None,
                slug: None,
                image: None,
                description: None,
                category: None,
                stock: None,
            },
            quantity,
        };

        let summary = CheckoutSummary::from_items(&[item("a", 100_000, 2), item("b", 50_000, 1)]);

        assert_eq!(summary.subtotal, Price::from_dong(250_000));
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.total, Price::from_dong(250_000));
    }
}
