//! Pure, side-effect-free query operations over a product snapshot.
//!
//! Every function here takes a snapshot slice and returns a new collection;
//! the input is never mutated, and the same input always produces the same
//! output. Callers run these on snapshots they own, so no locking is needed.

use crate::models::{CatalogQuery, Product, SortField, SortOrder};

/// Case-insensitive substring match of `keyword` against product titles.
///
/// Rejecting an empty keyword is the caller's concern (request validation);
/// an empty keyword here simply matches everything.
pub fn search(products: &[Product], keyword: &str) -> Vec<Product> {
    let needle = keyword.to_lowercase();
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Products in `category` (case-insensitive, exact) priced within
/// `[min_price, max_price]`, both bounds inclusive.
pub fn filter_by_category_and_price(
    products: &[Product],
    category: &str,
    min_price: f64,
    max_price: f64,
) -> Vec<Product> {
    products
        .iter()
        .filter(|p| {
            p.category.eq_ignore_ascii_case(category)
                && p.price >= min_price
                && p.price <= max_price
        })
        .cloned()
        .collect()
}

/// Stable sort by `field` in `order` direction.
///
/// Equal keys keep their relative input order in both directions; prices
/// compare numerically (`total_cmp`), titles lexicographically.
pub fn sort(products: &[Product], field: SortField, order: SortOrder) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match field {
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Title => a.title.cmp(&b.title),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Compose search, category filter, price range and sort into one pass.
///
/// Each predicate applies only when its input is present and non-empty,
/// except the price bounds, which always apply with defaults of 0 and
/// `f64::MAX`. When `sort_by` or `order` is absent the filtered set keeps
/// its input order.
pub fn compose(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let mut result = products.to_vec();

    if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
        result = search(&result, name);
    }

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        result.retain(|p| p.category.eq_ignore_ascii_case(category));
    }

    let min_price = query.min_price.unwrap_or(0.0);
    let max_price = query.max_price.unwrap_or(f64::MAX);
    result.retain(|p| p.price >= min_price && p.price <= max_price);

    if let (Some(field), Some(order)) = (query.sort_by, query.order) {
        result = sort(&result, field, order);
    }

    result
}
