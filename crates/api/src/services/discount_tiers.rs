//! Discount tier endpoints under `/discount-tiers` (admin).

use tracing::instrument;

use lumiere_core::{DiscountTierId, DiscountTierInput};

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{Ack, DiscountTier, ListResponse};

#[derive(Debug, Clone)]
pub struct DiscountTierService {
    client: ApiClient,
}

impl DiscountTierService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(id: &DiscountTierId) -> String {
        format!("discount-tiers/{}", segment(id.as_str()))
    }

    /// Tiers ordered by threshold, lowest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<DiscountTier>, ApiError> {
        let mut tiers = self
            .client
            .get::<ListResponse<DiscountTier>>("discount-tiers")
            .await?
            .into_items();
        tiers.sort_by(|a, b| a.tier.min_amount.cmp(&b.tier.min_amount));
        Ok(tiers)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid tier.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &DiscountTierInput) -> Result<DiscountTier, ApiError> {
        input.validate()?;
        self.client.post("discount-tiers", input).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid tier.
    #[instrument(skip(self, input), fields(tier_id = %id))]
    pub async fn update(
        &self,
        id: &DiscountTierId,
        input: &DiscountTierInput,
    ) -> Result<DiscountTier, ApiError> {
        input.validate()?;
        self.client.patch(&Self::path(id), input).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(tier_id = %id))]
    pub async fn delete(&self, id: &DiscountTierId) -> Result<(), ApiError> {
        let _: Option<Ack> = self.client.delete(&Self::path(id)).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(tier_id = %id))]
    pub async fn activate(&self, id: &DiscountTierId) -> Result<(), ApiError> {
        let _: Option<Ack> = self
            .client
            .patch_empty(&format!("{}/activate", Self::path(id)))
            .await?;
        Ok(())
    }
}
