//! User management endpoints under `/users` (admin).

use tracing::instrument;

use lumiere_core::UserId;

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{Ack, ListResponse, UpdateUserRequest, User};

#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(id: &UserId) -> String {
        format!("users/{}", segment(id.as_str()))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<User>>("users")
            .await?
            .into_items())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: &UserId) -> Result<User, ApiError> {
        self.client.get(&Self::path(id)).await
    }

    /// Patch a user's name, phone, role or active flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` when the patch is empty.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update(&self, id: &UserId, update: &UpdateUserRequest) -> Result<User, ApiError> {
        if update.is_empty() {
            return Err(lumiere_core::ValidationError::Required { field: "update" }.into());
        }
        self.client.patch(&Self::path(id), update).await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        let _: Option<Ack> = self.client.delete(&Self::path(id)).await?;
        tracing::info!("User deleted");
        Ok(())
    }
}
