//! Catalog Domain
//!
//! This crate implements a product catalog backed either by a persistent
//! store (MongoDB) or by a TTL cache over an upstream product API (Redis).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Orchestration over one snapshot
//! └──────┬──────┘
//!        │           ┌─────────────┐
//! ┌──────▼──────┐    │    Query    │  ← Pure search/filter/sort
//! │   Source    │───▶└─────────────┘
//! └──────┬──────┘
//!        │
//! ┌──────▼─────────────────────────┐
//! │ Store (MongoDB) / Cache (Redis)│  ← populated from the upstream feed
//! └────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     mongodb::MongoCatalogStore,
//!     source::DbProductSource,
//!     upstream::HttpProductFeed,
//!     service::CatalogService,
//! };
//! use mongodb::Client;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let store = MongoCatalogStore::new(&db);
//! let feed = HttpProductFeed::new("https://dummyjson.com/products", Duration::from_secs(10))?;
//! let source = DbProductSource::new(store, feed);
//! let service = CatalogService::new(source);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod service;
pub mod source;
pub mod store;
pub mod upstream;

// Re-export commonly used types
pub use cache::{RedisSnapshotCache, SnapshotCache};
pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{
    BulkUpdateRequest, CatalogQuery, FilterParams, ListParams, PriceUpdate, Product, ProductPage,
    ProductPatch, SearchParams, SortField, SortOrder, SortParams,
};
pub use self::mongodb::MongoCatalogStore;
pub use service::CatalogService;
pub use source::{CachedProductSource, DbProductSource, ProductSource};
pub use store::ProductStore;
pub use upstream::{HttpProductFeed, ProductFeed, UpstreamProduct};
