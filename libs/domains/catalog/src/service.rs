//! Catalog Service - orchestration over one snapshot per request

use std::sync::Arc;
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CatalogQuery, FilterParams, ListParams, Product, ProductPage, ProductPatch, SortField,
    SortOrder,
};
use crate::query;
use crate::source::ProductSource;

/// Catalog service binding validated requests to query operations.
///
/// Each operation takes one snapshot from the source and answers from it;
/// durability of the write operations depends on the source strategy (see
/// [`crate::source`]).
pub struct CatalogService<S: ProductSource> {
    source: Arc<S>,
}

impl<S: ProductSource> CatalogService<S> {
    /// Create a new CatalogService over the given product source
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// One page of the full collection with pagination metadata
    #[instrument(skip(self))]
    pub async fn list(&self, params: ListParams, path: &str) -> CatalogResult<ProductPage> {
        let products = self.source.snapshot().await?;
        Ok(ProductPage::paginate(
            products,
            params.page,
            params.per_page,
            path,
        ))
    }

    /// Products whose title contains `name`, case-insensitively
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> CatalogResult<Vec<Product>> {
        let products = self.source.snapshot().await?;
        Ok(query::search(&products, name))
    }

    /// Products in a category within an inclusive price range
    #[instrument(skip(self))]
    pub async fn filter(&self, params: &FilterParams) -> CatalogResult<Vec<Product>> {
        let products = self.source.snapshot().await?;
        Ok(query::filter_by_category_and_price(
            &products,
            &params.category,
            params.min_price.unwrap_or(0.0),
            params.max_price.unwrap_or(f64::MAX),
        ))
    }

    /// Full collection sorted by `field` in `order` direction
    #[instrument(skip(self))]
    pub async fn sorted(&self, field: SortField, order: SortOrder) -> CatalogResult<Vec<Product>> {
        let products = self.source.snapshot().await?;
        Ok(query::sort(&products, field, order))
    }

    /// One product by exact id match against the current snapshot.
    ///
    /// Resolved as first-in-collection-order should duplicates ever appear.
    #[instrument(skip(self))]
    pub async fn show(&self, id: i64) -> CatalogResult<Product> {
        let products = self.source.snapshot().await?;
        products
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Set one product's price through the source.
    ///
    /// Durable in database mode; local to this response in cache mode.
    #[instrument(skip(self))]
    pub async fn update_price(&self, id: i64, price: f64) -> CatalogResult<Product> {
        self.source
            .update_price(id, price)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Combined search + filter + sort query
    #[instrument(skip(self, params))]
    pub async fn query(&self, params: &CatalogQuery) -> CatalogResult<Vec<Product>> {
        let products = self.source.snapshot().await?;
        Ok(query::compose(&products, params))
    }

    /// Apply patches in listed order and return the full resulting
    /// collection; entries with unknown ids are skipped silently.
    #[instrument(skip(self, updates), fields(entries = updates.len()))]
    pub async fn bulk_update(&self, updates: Vec<ProductPatch>) -> CatalogResult<Vec<Product>> {
        self.source.bulk_update(updates).await
    }
}

impl<S: ProductSource> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}
