//! Commission option endpoints under `/commissions` (admin).
//!
//! Create and update refuse a split that does not total the commission pool
//! before any request is sent, the same check the admin form applies.

use tracing::instrument;

use lumiere_core::CommissionId;

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{Ack, Commission, CommissionInput, ListResponse};

#[derive(Debug, Clone)]
pub struct CommissionService {
    client: ApiClient,
}

impl CommissionService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(id: &CommissionId) -> String {
        format!("commissions/{}", segment(id.as_str()))
    }

    fn validate(input: &CommissionInput) -> Result<(), ApiError> {
        if input.name.trim().is_empty() {
            return Err(lumiere_core::ValidationError::Required { field: "name" }.into());
        }
        input.split.validate()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Commission>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<Commission>>("commissions")
            .await?
            .into_items())
    }

    /// The commission option currently applied to new orders, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn active(&self) -> Result<Option<Commission>, ApiError> {
        self.client.get("commissions/active").await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the split is unbalanced.
    #[instrument(skip(self, input), fields(name = %input.name, total = %input.split.total()))]
    pub async fn create(&self, input: &CommissionInput) -> Result<Commission, ApiError> {
        Self::validate(input)?;
        let created: Commission = self.client.post("commissions", input).await?;
        tracing::info!(commission_id = %created.id, "Commission created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the split is unbalanced.
    #[instrument(skip(self, input), fields(commission_id = %id, total = %input.split.total()))]
    pub async fn update(
        &self,
        id: &CommissionId,
        input: &CommissionInput,
    ) -> Result<Commission, ApiError> {
        Self::validate(input)?;
        self.client.patch(&Self::path(id), input).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(commission_id = %id))]
    pub async fn delete(&self, id: &CommissionId) -> Result<(), ApiError> {
        let _: Option<Ack> = self.client.delete(&Self::path(id)).await?;
        Ok(())
    }

    /// Make this option the active one; the backend deactivates the others.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(commission_id = %id))]
    pub async fn activate(&self, id: &CommissionId) -> Result<(), ApiError> {
        let _: Option<Ack> = self
            .client
            .patch_empty(&format!("{}/activate", Self::path(id)))
            .await?;
        Ok(())
    }
}
