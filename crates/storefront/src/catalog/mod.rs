//! Remote product catalog client.
//!
//! # Architecture
//!
//! - The catalog is a read-only REST JSON API (`GET /products`,
//!   `GET /products/{id}`); the storefront never writes to it
//! - The product list is cached in memory via `moka` (5 minute TTL by default)
//! - Single-product lookups are never cached and never fail: every failure
//!   collapses to "absent", which callers render as not found
//!
//! # Example
//!
//! ```rust,ignore
//! use fakeshop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let products = client.list_products().await?;
//! let product = client.get_product(ProductId::new(7)).await;
//! ```

use std::sync::Arc;

use fakeshop_core::{Product, ProductId};
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;

/// Cache key under which the full product list is stored.
const PRODUCTS_CACHE_KEY: &str = "products";

/// Errors that can occur when listing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the remote product catalog.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a product array. Failures are not cached and not retried.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for product list");
            return Ok(products.as_ref().clone());
        }

        let url = format!("{}/products", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status for product list"
            );
            return Err(CatalogError::Status(status));
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog product list"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched product list");
        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    /// Look up a single product.
    ///
    /// Returns `None` when the product does not exist and also when the
    /// lookup fails for any other reason; the failure is logged.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Option<Product> {
        match self.fetch_product(id).await {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, "Product lookup failed");
                None
            }
        }
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let url = format!("{}/products/{id}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        // The catalog answers unknown IDs with 200 and an empty body
        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() {
            return Ok(None);
        }

        Ok(serde_json::from_str::<Option<Product>>(body)?)
    }
}
