//! End-to-end tests for the Lumiere storefront client.
//!
//! Each test gets a [`TestContext`]: a mock backend plus the same on-disk
//! stores the CLI uses, in a temporary directory. Reopening the stores from
//! disk shows what a later process would see.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumiere-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::MockServer;

use lumiere_api::models::Product;
use lumiere_api::{ApiClient, ApiConfig, AuthSession, FileStore, KeyValueStore, StorageError};
use lumiere_storefront::cart::CartStore;
use lumiere_storefront::checkout::{CheckoutFlow, PaymentReturn, ReturnUrls};

/// Return URL handed to the payment gateway in tests.
pub const RETURN_URL: &str = "http://shop.test/payment/success";
/// Cancel URL handed to the payment gateway in tests.
pub const CANCEL_URL: &str = "http://shop.test/payment/cancel";

/// A mock backend and a data directory holding `local.json` and
/// `session.json`.
pub struct TestContext {
    pub server: MockServer,
    dir: TempDir,
}

/// Error setting up a test context.
pub type SetupResult<T> = Result<T, Box<dyn std::error::Error>>;

impl TestContext {
    /// Start a mock backend and create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub async fn new() -> SetupResult<Self> {
        Ok(Self {
            server: MockServer::start().await,
            dir: tempfile::tempdir()?,
        })
    }

    #[must_use]
    pub fn local_path(&self) -> PathBuf {
        self.dir.path().join("local.json")
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Open the persistent store fresh from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn local(&self) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        Ok(Arc::new(FileStore::open(self.local_path())?))
    }

    /// Open the session store fresh from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn session(&self) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        Ok(Arc::new(FileStore::open(self.session_path())?))
    }

    /// A client against the mock backend authenticating from the local store.
    ///
    /// # Errors
    ///
    /// Returns an error if the stores or client cannot be set up.
    pub fn client(&self) -> SetupResult<ApiClient> {
        let config = ApiConfig::new(&self.server.uri())?;
        Ok(ApiClient::new(&config, AuthSession::new(self.local()?))?)
    }

    /// The cart as a new process would load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be opened.
    pub fn cart(&self) -> Result<CartStore, StorageError> {
        Ok(CartStore::new(self.local()?))
    }

    /// A checkout flow sharing `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client or session store cannot be set up.
    pub fn checkout(&self, cart: &CartStore) -> SetupResult<CheckoutFlow> {
        Ok(CheckoutFlow::new(
            self.client()?,
            cart.clone(),
            self.session()?,
            ReturnUrls {
                return_url: RETURN_URL.to_string(),
                cancel_url: CANCEL_URL.to_string(),
            },
        ))
    }

    /// Payment return handling with fast retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the client or session store cannot be set up.
    pub fn payment_return(&self) -> SetupResult<PaymentReturn> {
        Ok(PaymentReturn::new(self.client()?, self.session()?).with_retry(2, 1))
    }
}

/// A catalog product as the backend returns it.
#[must_use]
pub fn product_json(id: &str, name: &str, price: i64) -> Value {
    json!({"id": id, "name": name, "price": price})
}

/// Decode a product fixture.
///
/// # Errors
///
/// Returns an error if the fixture is not a valid product.
pub fn product(id: &str, name: &str, price: i64) -> Result<Product, serde_json::Error> {
    serde_json::from_value(product_json(id, name, price))
}

/// A signed-in user as returned by `/auth/login`.
#[must_use]
pub fn auth_json(role: &str) -> Value {
    json!({
        "access_token": "jwt-token",
        "user": {"id": 7, "email": "lan@example.com", "fullName": "Nguyen Lan", "role": role}
    })
}
