//! Reporting endpoints under `/reports` (admin).
//!
//! F1/F2 referral levels are computed by the backend; the client only
//! displays them.

use tracing::instrument;

use lumiere_core::UserId;

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{
    DashboardStats, ListResponse, ReferralReport, ReportRange, RevenuePoint, UserReport,
    UserReportDetail,
};

#[derive(Debug, Clone)]
pub struct ReportService {
    client: ApiClient,
}

impl ReportService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.client.get("reports/dashboard").await
    }

    /// Revenue grouped by day, week or month.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the range ends before it starts.
    #[instrument(skip(self))]
    pub async fn revenue(&self, range: &ReportRange) -> Result<Vec<RevenuePoint>, ApiError> {
        if let (Some(start), Some(end)) = (range.start_date, range.end_date)
            && end < start
        {
            return Err(lumiere_core::ValidationError::Invalid {
                field: "endDate",
                reason: format!("must not be before {start}"),
            }
            .into());
        }
        Ok(self
            .client
            .get_query::<ListResponse<RevenuePoint>, _>("reports/revenue", range)
            .await?
            .into_items())
    }

    /// Per-user spend, referral counts and commission earned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<UserReport>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<UserReport>>("reports/users")
            .await?
            .into_items())
    }

    /// One user's report with orders and F1/F2 members.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user_detail(&self, id: &UserId) -> Result<UserReportDetail, ApiError> {
        self.client
            .get(&format!("reports/users/{}", segment(id.as_str())))
            .await
    }

    /// Referral trees for every user with a referral code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn referrals(&self) -> Result<Vec<ReferralReport>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<ReferralReport>>("reports/referrals")
            .await?
            .into_items())
    }
}
