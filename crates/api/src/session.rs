//! Authenticated session state.
//!
//! Holds the bearer token and the signed-in user in a [`KeyValueStore`]
//! under [`keys::AUTH_TOKEN`] and [`keys::CURRENT_USER`]. A token that
//! cannot be read is treated as absent: the worst case is an anonymous
//! request that the backend rejects.

use std::sync::Arc;

use secrecy::SecretString;

use crate::models::{AuthResponse, User};
use crate::storage::{KeyValueStore, StorageError, keys};

/// Client-side view of who is signed in.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
}

impl AuthSession {
    /// Create a session backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.store.get(keys::AUTH_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token, continuing anonymously");
                None
            }
        }
    }

    /// The signed-in user, if any.
    ///
    /// A stored user that no longer parses is ignored.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.store.get(keys::CURRENT_USER) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read current user");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "Stored current user is malformed"))
            .ok()
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Whether the signed-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    /// Persist the token and user from a login or registration response.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn store_login(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        self.store.set(keys::AUTH_TOKEN, &auth.access_token)?;
        self.store_user(&auth.user)
    }

    /// Replace the stored user (e.g. after refreshing the profile).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn store_user(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user).map_err(|e| {
            StorageError::Unavailable(format!("failed to encode current user: {e}"))
        })?;
        self.store.set(keys::CURRENT_USER, &json)
    }

    /// Forget the token and user.
    ///
    /// Best effort: failures are logged, not returned, because callers use
    /// this on paths that are already reporting another error.
    pub fn clear(&self) {
        for key in [keys::AUTH_TOKEN, keys::CURRENT_USER] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear session key");
            }
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
