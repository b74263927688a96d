//! Product Cache Module
//!
//! Typed helpers for caching product detail records.

use std::time::Duration;

use crate::cache::TtlCache;
use crate::error::Result;
use crate::models::Product;

/// How long a product detail stays cached
pub const PRODUCT_TTL: Duration = Duration::from_secs(15 * 60);

// == Product Cache ==
/// Product detail cache keyed by product id.
#[derive(Debug, Clone)]
pub struct ProductCache {
    cache: TtlCache,
}

impl ProductCache {
    /// Wraps `cache`; products are kept for [`PRODUCT_TTL`].
    pub fn new(cache: TtlCache) -> Self {
        Self { cache }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Builds the logical cache key for a product.
    pub fn key(product_id: u64) -> String {
        format!("product_detail:{}", product_id)
    }

    /// Caches `product` under its own id.
    pub async fn set_product(&self, product: &Product) -> Result<()> {
        self.cache.set(&Self::key(product.id), product, PRODUCT_TTL).await
    }

    /// Returns the cached product, if live.
    pub async fn get_product(&self, product_id: u64) -> Option<Product> {
        self.cache.get(&Self::key(product_id)).await
    }

    /// Drops the cached product.
    pub async fn remove_product(&self, product_id: u64) -> Result<()> {
        self.cache.remove(&Self::key(product_id)).await
    }
}
