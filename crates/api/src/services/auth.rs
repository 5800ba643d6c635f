//! Sign-in, registration and profile.

use tracing::instrument;

use lumiere_core::{Email, ValidationError};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub referral_code: Option<String>,
}

impl Registration {
    /// Check the fields the backend would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::Required { field: "fullName" });
        }
        Email::parse(&self.email).map_err(|e| ValidationError::Invalid {
            field: "email",
            reason: e.to_string(),
        })?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

/// Authentication endpoints under `/auth`.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and persist the token and user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401 if the credentials are
    /// rejected, or a storage error if the session cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let auth: AuthResponse = self
            .client
            .post("auth/login", &LoginRequest { email, password })
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized { .. } => ApiError::Api {
                    status: 401,
                    message: "Invalid email or password".to_string(),
                },
                other => other,
            })?;
        self.client.session().store_login(&auth)?;
        tracing::info!(user_id = %auth.user.id, role = %auth.user.role, "Signed in");
        Ok(auth.user)
    }

    /// Create an account, then persist the returned token and user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` before any request if the form is
    /// incomplete, or the backend error otherwise.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        registration.validate()?;

        let request = RegisterRequest {
            email: registration.email.trim(),
            password: &registration.password,
            full_name: registration.full_name.trim(),
            phone: registration.phone.as_deref(),
            referral_code: registration.referral_code.as_deref(),
        };
        let auth: AuthResponse = self.client.post("auth/register", &request).await?;
        self.client.session().store_login(&auth)?;
        tracing::info!(user_id = %auth.user.id, "Registered");
        Ok(auth.user)
    }

    /// Fetch the signed-in user's profile and refresh the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token has expired.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User, ApiError> {
        let user: User = self.client.get("auth/profile").await?;
        self.client.session().store_user(&user)?;
        Ok(user)
    }

    /// Forget the local session. The backend keeps no server-side session.
    pub fn logout(&self) {
        self.client.session().clear();
        tracing::info!("Signed out");
    }

    /// The user stored at the last sign-in, without a network call.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.client.session().current_user()
    }
}
