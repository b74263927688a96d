//! Catalog Module
//!
//! Product API client: cache-first reads, retried fetches, cache write-back.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::{ProductCache, TtlCache};
use crate::error::TransportError;
use crate::models::{Category, CategoryListing, Product, ProductPage};
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::transport::Transport;

/// Cache key of the category list
pub const CATEGORIES_KEY: &str = "categories";

/// Retry policy for the category list: 2 attempts from a 1 second base.
pub fn category_retry_policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_max_attempts(2)
        .with_base_delay(Duration::from_millis(1000))
}

// == Catalog ==
/// Composes the product cache, the retry executors and the transport.
#[derive(Clone)]
pub struct Catalog {
    transport: Arc<dyn Transport>,
    products: ProductCache,
    retry: RetryExecutor,
    category_retry: RetryExecutor,
}

impl Catalog {
    /// Creates a catalog client; `policy` governs product calls.
    pub fn new(transport: Arc<dyn Transport>, cache: TtlCache, policy: RetryPolicy) -> Self {
        Self {
            transport,
            products: ProductCache::new(cache),
            retry: RetryExecutor::new(policy),
            category_retry: RetryExecutor::new(category_retry_policy()),
        }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &TtlCache {
        self.products.cache()
    }

    /// Returns the product detail cache.
    pub fn products(&self) -> &ProductCache {
        &self.products
    }

    async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        self.fetch_with(&self.retry, path, query).await
    }

    async fn fetch_with<T>(
        &self,
        retry: &RetryExecutor,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        let response = retry.run(|| transport.get(path, query)).await?;
        response.json()
    }

    // == Product Detail ==
    /// Returns a product, from cache when live, otherwise from the API.
    ///
    /// A fetched product is written back to the cache; a failed write is
    /// logged and does not fail the call.
    pub async fn get_product(&self, product_id: u64) -> Result<Product, TransportError> {
        if let Some(product) = self.products.get_product(product_id).await {
            debug!("Using cached product: {}", product_id);
            return Ok(product);
        }

        info!("Fetching product from API: {}", product_id);
        self.fetch_and_cache(product_id).await
    }

    /// Fetches a product from the API regardless of the cache, then caches it.
    pub async fn refresh_product(&self, product_id: u64) -> Result<Product, TransportError> {
        info!("Force refreshing product: {}", product_id);
        self.fetch_and_cache(product_id).await
    }

    async fn fetch_and_cache(&self, product_id: u64) -> Result<Product, TransportError> {
        let product: Product = self
            .fetch(&format!("products/{}", product_id), &[])
            .await?;

        if let Err(err) = self.products.set_product(&product).await {
            warn!("Failed to cache product {}: {}", product_id, err);
        }

        Ok(product)
    }

    // == Categories ==
    /// Returns the category list, from cache when live, otherwise from the
    /// API. Cached with the cache's default TTL.
    pub async fn get_categories(&self) -> Result<Vec<Category>, TransportError> {
        if let Some(categories) = self.cache().get::<Vec<Category>>(CATEGORIES_KEY).await {
            debug!("Using cached categories");
            return Ok(categories);
        }

        info!("Fetching categories from API");
        self.fetch_and_cache_categories().await
    }

    /// Fetches the category list regardless of the cache, then caches it.
    pub async fn refresh_categories(&self) -> Result<Vec<Category>, TransportError> {
        info!("Force refreshing categories");
        self.fetch_and_cache_categories().await
    }

    async fn fetch_and_cache_categories(&self) -> Result<Vec<Category>, TransportError> {
        let listings: Vec<CategoryListing> = self
            .fetch_with(&self.category_retry, "products/categories", &[])
            .await?;
        let categories = Category::from_listings(listings);

        if let Err(err) = self.cache().set_default(CATEGORIES_KEY, &categories).await {
            warn!("Failed to cache categories: {}", err);
        }

        Ok(categories)
    }

    // == Listing ==
    /// Fetches one page of products.
    pub async fn list_products(&self, limit: u32, skip: u32) -> Result<ProductPage, TransportError> {
        let query = [("limit", limit.to_string()), ("skip", skip.to_string())];
        self.fetch("products", &query).await
    }

    /// Searches products by free text.
    pub async fn search_products(&self, text: &str) -> Result<ProductPage, TransportError> {
        let query = [("q", text.to_string())];
        self.fetch("products/search", &query).await
    }
}
