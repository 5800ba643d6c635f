//! Admin reports.
//!
//! All aggregation, including the F1/F2 referral tree, is computed by the
//! backend. These types only carry the results.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{Price, RevenuePeriod, UserId};

use super::order::Order;

/// Response of `GET /reports/dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Price,
    pub total_orders: u64,
    pub total_users: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub total_commission: Price,
}

/// One bucket of `GET /reports/revenue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Bucket label (`2026-10-01`, `2026-W40`, `2026-10` depending on period).
    pub period: String,
    pub revenue: Price,
    #[serde(default)]
    pub orders: u64,
}

/// Query string of the date-ranged report endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "groupBy", skip_serializing_if = "Option::is_none")]
    pub period: Option<RevenuePeriod>,
}

/// Per-user sales and referral summary from `GET /reports/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_spent: Price,
    /// Users this user referred directly.
    #[serde(default)]
    pub f1_count: u64,
    /// Users referred by this user's F1s.
    #[serde(default)]
    pub f2_count: u64,
    #[serde(default)]
    pub commission_earned: Price,
}

/// A member of someone's referral tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralMember {
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub total_spent: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Response of `GET /reports/users/:userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReportDetail {
    #[serde(flatten)]
    pub summary: UserReport,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub f1: Vec<ReferralMember>,
    #[serde(default)]
    pub f2: Vec<ReferralMember>,
}

/// One referrer's tree from `GET /reports/referrals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralReport {
    pub user_id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub f1: Vec<ReferralMember>,
    #[serde(default)]
    pub f2: Vec<ReferralMember>,
}

impl ReferralReport {
    /// Combined spend of the whole F1 and F2 tree.
    #[must_use]
    pub fn network_spend(&self) -> Price {
        self.f1
            .iter()
            .chain(&self.f2)
            .map(|member| member.total_spent)
            .sum()
    }
}
