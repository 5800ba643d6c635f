//! PayOS merchant configuration endpoints under `/payos-config` (admin).

use tracing::instrument;

use lumiere_core::{PayOsConfigId, PayOsCredentials};

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{Ack, ListResponse, PayOsConfig};

#[derive(Debug, Clone)]
pub struct PayOsConfigService {
    client: ApiClient,
}

impl PayOsConfigService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(id: &PayOsConfigId) -> String {
        format!("payos-config/{}", segment(id.as_str()))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PayOsConfig>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<PayOsConfig>>("payos-config")
            .await?
            .into_items())
    }

    /// The configuration payment links are currently created with.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn active(&self) -> Result<Option<PayOsConfig>, ApiError> {
        self.client.get("payos-config/active").await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when a key is blank or looks like a
    /// placeholder.
    #[instrument(skip(self, credentials), fields(client_id = %credentials.client_id))]
    pub async fn create(&self, credentials: &PayOsCredentials) -> Result<PayOsConfig, ApiError> {
        credentials.validate()?;
        let created: PayOsConfig = self.client.post("payos-config", credentials).await?;
        tracing::info!(config_id = %created.id, "PayOS config created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Validation` when a key is blank or looks like a
    /// placeholder.
    #[instrument(skip(self, credentials), fields(config_id = %id))]
    pub async fn update(
        &self,
        id: &PayOsConfigId,
        credentials: &PayOsCredentials,
    ) -> Result<PayOsConfig, ApiError> {
        credentials.validate()?;
        self.client.patch(&Self::path(id), credentials).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(config_id = %id))]
    pub async fn delete(&self, id: &PayOsConfigId) -> Result<(), ApiError> {
        let _: Option<Ack> = self.client.delete(&Self::path(id)).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(config_id = %id))]
    pub async fn activate(&self, id: &PayOsConfigId) -> Result<(), ApiError> {
        let _: Option<Ack> = self
            .client
            .patch_empty(&format!("{}/activate", Self::path(id)))
            .await?;
        Ok(())
    }
}
