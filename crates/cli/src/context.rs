//! Shared setup for every command.
//!
//! The CLI keeps the same client-side state a browser would: a persistent
//! store (`local.json`: auth token, current user, cart) and a per-session
//! store (`session.json`: checkout correlation IDs, last order) in
//! `LUMIERE_DATA_DIR`.

use std::sync::Arc;

use thiserror::Error;

use lumiere_api::{ApiClient, AuthSession, FileStore, KeyValueStore};
use lumiere_storefront::cart::CartStore;
use lumiere_storefront::checkout::{CheckoutFlow, PaymentReturn, ReturnUrls};
use lumiere_storefront::config::StorefrontConfig;

/// Errors raised by the CLI itself rather than the backend.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not signed in. Run `lumiere login` first.")]
    NotSignedIn,

    #[error("This command needs an administrator account.")]
    NotAdmin,

    #[error("Nothing to update. Pass at least one field.")]
    NothingToUpdate,

    #[error("The cart could not be saved to the data directory. Check LUMIERE_DATA_DIR.")]
    CartNotSaved,
}

/// Everything a command needs to talk to the backend.
pub struct Context {
    config: StorefrontConfig,
    client: ApiClient,
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Context {
    /// Load configuration and open the on-disk stores.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a store cannot be
    /// opened.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_env()?;
        let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.local_store_path())?);
        let session: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(config.session_store_path())?);
        let client = ApiClient::new(&config.api, AuthSession::new(local.clone()))?;

        tracing::debug!(api = %config.api.base_url, data_dir = %config.data_dir.display(), "Context ready");
        Ok(Self {
            config,
            client,
            local,
            session,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cart(&self) -> CartStore {
        CartStore::new(self.local.clone())
    }

    pub fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new(
            self.client.clone(),
            self.cart(),
            self.session.clone(),
            ReturnUrls::from_config(&self.config),
        )
    }

    pub fn payment_return(&self) -> PaymentReturn {
        PaymentReturn::new(self.client.clone(), self.session.clone())
    }

    /// Fail unless someone is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotSignedIn`].
    pub fn require_login(&self) -> Result<(), CliError> {
        if self.client.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotSignedIn)
        }
    }

    /// Fail unless an administrator is signed in. The backend checks the
    /// role again on every admin endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NotSignedIn`] or [`CliError::NotAdmin`].
    pub fn require_admin(&self) -> Result<(), CliError> {
        self.require_login()?;
        if self.client.session().is_admin() {
            Ok(())
        } else {
            Err(CliError::NotAdmin)
        }
    }
}
