//! Client for the upstream product API
//!
//! The upstream is treated as a black box that serves the full product set
//! in one payload. Failures are never retried here; they surface to the
//! caller as an unavailable upstream.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::models::Product;

/// Projection of one upstream payload item; unknown fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

/// Cache mode serves upstream items as-is, upstream ids included.
impl From<UpstreamProduct> for Product {
    fn from(item: UpstreamProduct) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: item.price,
            description: item.description,
            category: item.category,
        }
    }
}

/// Envelope the upstream wraps its product array in
#[derive(Debug, Deserialize)]
struct UpstreamPayload {
    products: Vec<UpstreamProduct>,
}

/// Remote product feed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductFeed: Send + Sync {
    /// Fetch the full upstream product set in one call
    async fn fetch(&self) -> CatalogResult<Vec<UpstreamProduct>>;
}

/// HTTP implementation of [`ProductFeed`] over reqwest
pub struct HttpProductFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpProductFeed {
    /// Build a feed client with a request timeout.
    ///
    /// The timeout is the only cancellation semantic applied to the remote
    /// call; on expiry the fetch fails like any other transport error.
    pub fn new(url: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ProductFeed for HttpProductFeed {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> CatalogResult<Vec<UpstreamProduct>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %body,
                "Failed to retrieve data from upstream product API"
            );
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: UpstreamPayload = response.json().await?;

        info!(
            count = payload.products.len(),
            "Fetched products from upstream product API"
        );

        Ok(payload.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_parses_and_ignores_unknown_fields() {
        let raw = r#"{
            "products": [
                {
                    "id": 1,
                    "title": "Apple Phone",
                    "price": 999.0,
                    "description": "A phone",
                    "category": "electronics",
                    "rating": 4.7,
                    "thumbnail": "https://example.com/1.png"
                },
                {
                    "id": 2,
                    "title": "Banana",
                    "price": 2.0
                }
            ],
            "total": 2,
            "skip": 0,
            "limit": 30
        }"#;

        let payload: UpstreamPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.products.len(), 2);
        assert_eq!(payload.products[0].category, "electronics");
        // Absent optional fields default to empty
        assert_eq!(payload.products[1].description, "");
        assert_eq!(payload.products[1].category, "");
    }

    #[test]
    fn test_upstream_product_projects_into_product() {
        let item = UpstreamProduct {
            id: 7,
            title: "Desk Lamp".to_string(),
            price: 19.5,
            description: "A lamp".to_string(),
            category: "home".to_string(),
        };

        let product = Product::from(item);
        assert_eq!(product.id, 7);
        assert_eq!(product.title, "Desk Lamp");
        assert_eq!(product.price, 19.5);
        assert_eq!(product.category, "home");
    }
}
