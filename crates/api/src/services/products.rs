//! Product catalog with a short-lived cache.
//!
//! The catalog changes rarely, so product lists and single products are
//! cached for 5 minutes with `moka`. Admin edits happen elsewhere; call
//! [`ProductService::invalidate`] to force a refresh.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use lumiere_core::ProductId;

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{ListResponse, Product};

const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Catalog endpoints under `/products`.
#[derive(Clone)]
pub struct ProductService {
    client: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl ProductService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();
        Self { client, cache }
    }

    /// List the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::Products).await {
            debug!(count = products.len(), "Product list cache hit");
            return Ok(products.as_ref().clone());
        }

        let products = self
            .client
            .get::<ListResponse<Product>>("products")
            .await?
            .into_items();

        self.cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Product cache hit");
            return Ok(*product);
        }

        let product: Product = self
            .client
            .get(&format!("products/{}", segment(id.as_str())))
            .await?;

        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Drop every cached catalog entry.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("client", &self.client)
            .field("cached_entries", &self.cache.entry_count())
            .finish()
    }
}
