use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{Product, ProductPatch};

/// Persistence interface for the product catalog
///
/// This trait defines the data access surface the database-backed source
/// needs. Implementations can use different storage backends; the bundled
/// one uses MongoDB.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Number of stored products
    async fn count(&self) -> CatalogResult<u64>;

    /// Full collection in stable id order
    async fn all(&self) -> CatalogResult<Vec<Product>>;

    /// Look up one product by id
    async fn get(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// Insert a single product
    async fn insert(&self, product: &Product) -> CatalogResult<()>;

    /// Atomically set the price of one product, returning the updated record
    async fn set_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>>;

    /// Atomically apply the present fields of one patch, returning the
    /// updated record; `None` when the id does not exist
    async fn apply_patch(&self, patch: &ProductPatch) -> CatalogResult<Option<Product>>;
}
