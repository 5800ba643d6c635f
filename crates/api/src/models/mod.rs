//! Request and response shapes of the backend REST contract.
//!
//! Field names follow the backend's camelCase JSON. Optional fields are
//! defaulted so older backend versions that omit them still deserialize.

pub mod commission;
pub mod discount_tier;
pub mod order;
pub mod payment;
pub mod payos;
pub mod product;
pub mod report;
pub mod user;

pub use commission::{Commission, CommissionInput};
pub use discount_tier::DiscountTier;
pub use order::{
    CreateOrderItem, CreateOrderRequest, Order, OrderItem, OrderQuery, UpdateOrderStatusRequest,
};
pub use payment::{
    CancelPaymentRequest, CreatePaymentRequest, PaymentInfo, PaymentLink, PaymentTransaction,
};
pub use payos::PayOsConfig;
pub use product::Product;
pub use report::{
    DashboardStats, ReferralMember, ReferralReport, ReportRange, RevenuePoint, UserReport,
    UserReportDetail,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User};

use serde::Deserialize;

/// A list endpoint response.
///
/// Most list endpoints return a bare JSON array; paginated admin endpoints
/// wrap it as `{"data": [...], "total": n}`. Both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// A bare array.
    Plain(Vec<T>),
    /// A paginated envelope.
    Paged {
        /// The page of items.
        data: Vec<T>,
        /// Total number of items across all pages, if reported.
        #[serde(default)]
        total: Option<u64>,
    },
}

impl<T> ListResponse<T> {
    /// Discard pagination metadata and return the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paged { data: items, .. } => items,
        }
    }
}

/// Generic `{"message": "..."}` acknowledgement returned by delete and
/// activate endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_accepts_bare_array() {
        let list: ListResponse<u32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(list.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_response_accepts_envelope() {
        let list: ListResponse<u32> =
            serde_json::from_str(r#"{"data":[4,5],"total":12}"#).unwrap();
        assert_eq!(list.into_items(), vec![4, 5]);
    }
}
