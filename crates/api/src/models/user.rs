//! Users and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{Email, UserId, UserRole};

/// A user account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// Code other users enter to join this user's referral tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
    /// The user who referred this one (their F1 parent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<UserId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_true() -> bool {
    true
}

impl User {
    /// Whether the user may use the admin dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Name to show in greetings, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            self.email.as_str()
        } else {
            &self.full_name
        }
    }
}

/// Response of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<&'a str>,
}

/// Body of `PATCH /users/:id`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    /// Whether the request would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
    }
}
