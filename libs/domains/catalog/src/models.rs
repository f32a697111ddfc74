use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};

/// Field a product listing can be sorted by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    Price,
    Title,
}

/// Sort direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Product entity
///
/// In database mode this is the stored record (ids assigned sequentially at
/// ingestion); in cache mode it is the projection of one upstream item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier within a snapshot
    pub id: i64,
    /// Product title
    pub title: String,
    /// Price, always non-negative
    pub price: f64,
    /// Product description
    pub description: String,
    /// Free-form grouping key, compared case-insensitively
    pub category: String,
}

/// Pagination parameters for product listing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct ListParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1))]
    pub per_page: u64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    10
}

/// Title search parameters
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct SearchParams {
    /// Keyword matched case-insensitively against product titles
    #[validate(length(min = 1))]
    pub name: String,
}

/// Category + price range filter parameters
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FilterParams {
    /// Category to match (case-insensitive, exact)
    #[validate(length(min = 1))]
    pub category: String,
    /// Inclusive lower price bound, defaults to 0
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound, defaults to the maximum representable
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
}

impl FilterParams {
    /// Pre-condition check run before the service is invoked.
    pub fn check_price_bounds(&self) -> CatalogResult<()> {
        check_price_bounds(self.min_price, self.max_price)
    }
}

/// Sort parameters; both fields are required
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct SortParams {
    pub sort_by: SortField,
    pub order: SortOrder,
}

/// Combined search + filter + sort query
///
/// Every predicate is optional; price bounds are always applied with their
/// defaults. Unlike [`FilterParams`], `category` is optional here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
pub struct CatalogQuery {
    /// Keyword matched case-insensitively against product titles
    #[validate(length(min = 1))]
    pub name: Option<String>,
    /// Category to match (case-insensitive, exact)
    #[validate(length(min = 1))]
    pub category: Option<String>,
    /// Inclusive lower price bound, defaults to 0
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound, defaults to the maximum representable
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    /// Sort field; sorting is applied only when `order` is present too
    pub sort_by: Option<SortField>,
    /// Sort direction; sorting is applied only when `sort_by` is present too
    pub order: Option<SortOrder>,
}

impl CatalogQuery {
    /// Pre-condition check run before the service is invoked.
    pub fn check_price_bounds(&self) -> CatalogResult<()> {
        check_price_bounds(self.min_price, self.max_price)
    }
}

fn check_price_bounds(min_price: Option<f64>, max_price: Option<f64>) -> CatalogResult<()> {
    let min = min_price.unwrap_or(0.0);
    if let Some(max) = max_price {
        if max < min {
            return Err(CatalogError::Validation(format!(
                "max_price {} must be greater than or equal to min_price {}",
                max, min
            )));
        }
    }
    Ok(())
}

/// Price update request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PriceUpdate {
    /// New price, must be non-negative
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// One entry of a bulk update; absent fields are left unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductPatch {
    /// Id of the product to update
    pub id: i64,
    /// New price, must be non-negative
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    /// New category
    #[validate(length(min = 1))]
    pub category: Option<String>,
}

/// Bulk update request body; entries are applied in listed order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkUpdateRequest {
    #[validate(nested)]
    pub updates: Vec<ProductPatch>,
}

/// One page of products with length-aware pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPage {
    pub current_page: u64,
    pub data: Vec<Product>,
    /// 1-based index of the first item on this page, None when empty
    pub from: Option<u64>,
    /// 1-based index of the last item on this page, None when empty
    pub to: Option<u64>,
    pub last_page: u64,
    pub path: String,
    pub per_page: u64,
    pub total: u64,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl ProductPage {
    /// Slice one page out of a full snapshot and compute its metadata.
    ///
    /// `page` and `per_page` are expected to be validated (>= 1) upstream.
    pub fn paginate(products: Vec<Product>, page: u64, per_page: u64, path: &str) -> Self {
        let total = products.len() as u64;
        let last_page = total.div_ceil(per_page).max(1);
        let offset = (page - 1) * per_page;

        let data: Vec<Product> = products
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .collect();

        let from = if data.is_empty() { None } else { Some(offset + 1) };
        let to = from.map(|start| start + data.len() as u64 - 1);

        let next_page_url =
            (page < last_page).then(|| page_url(path, page + 1, per_page));
        let prev_page_url = (page > 1).then(|| page_url(path, page - 1, per_page));

        Self {
            current_page: page,
            data,
            from,
            to,
            last_page,
            path: path.to_string(),
            per_page,
            total,
            next_page_url,
            prev_page_url,
        }
    }
}

fn page_url(path: &str, page: u64, per_page: u64) -> String {
    format!("{}?page={}&per_page={}", path, page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price: id as f64,
            description: String::new(),
            category: "general".to_string(),
        }
    }

    #[test]
    fn test_paginate_first_page() {
        let products: Vec<Product> = (1..=25).map(product).collect();
        let page = ProductPage::paginate(products, 1, 10, "/api/products");

        assert_eq!(page.current_page, 1);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(1));
        assert_eq!(page.to, Some(10));
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("/api/products?page=2&per_page=10")
        );
        assert_eq!(page.prev_page_url, None);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let products: Vec<Product> = (1..=25).map(product).collect();
        let page = ProductPage::paginate(products, 3, 10, "/api/products");

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.from, Some(21));
        assert_eq!(page.to, Some(25));
        assert_eq!(page.next_page_url, None);
        assert_eq!(
            page.prev_page_url.as_deref(),
            Some("/api/products?page=2&per_page=10")
        );
    }

    #[test]
    fn test_paginate_out_of_range_page_is_empty() {
        let products: Vec<Product> = (1..=5).map(product).collect();
        let page = ProductPage::paginate(products, 4, 10, "/api/products");

        assert!(page.data.is_empty());
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
        assert_eq!(page.total, 5);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn test_paginate_empty_collection() {
        let page = ProductPage::paginate(Vec::new(), 1, 10, "/api/products");

        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 1);
        assert!(page.data.is_empty());
        assert_eq!(page.next_page_url, None);
    }

    #[test]
    fn test_check_price_bounds_accepts_equal_bounds() {
        let params = FilterParams {
            category: "electronics".to_string(),
            min_price: Some(10.0),
            max_price: Some(10.0),
        };
        assert!(params.check_price_bounds().is_ok());
    }

    #[test]
    fn test_check_price_bounds_rejects_inverted_bounds() {
        let params = FilterParams {
            category: "electronics".to_string(),
            min_price: Some(100.0),
            max_price: Some(50.0),
        };
        let err = params.check_price_bounds().unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_check_price_bounds_defaults_when_absent() {
        let query = CatalogQuery::default();
        assert!(query.check_price_bounds().is_ok());
    }

    #[test]
    fn test_sort_field_parses_from_snake_case() {
        use std::str::FromStr;
        assert_eq!(SortField::from_str("price").unwrap(), SortField::Price);
        assert_eq!(SortOrder::from_str("desc").unwrap(), SortOrder::Desc);
        assert!(SortField::from_str("rating").is_err());
    }

    #[test]
    fn test_bulk_patch_validation() {
        let valid = ProductPatch {
            id: 1,
            price: Some(3.0),
            category: None,
        };
        assert!(valid.validate().is_ok());

        let negative_price = ProductPatch {
            id: 1,
            price: Some(-3.0),
            category: None,
        };
        assert!(negative_price.validate().is_err());

        let empty_category = ProductPatch {
            id: 1,
            price: None,
            category: Some(String::new()),
        };
        assert!(empty_category.validate().is_err());
    }
}
