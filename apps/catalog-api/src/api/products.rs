//! Catalog routes wiring
//!
//! Builds the domain router over the source implementation selected by the
//! configured mode.

use axum::Router;
use domain_catalog::{
    CachedProductSource, CatalogService, DbProductSource, HttpProductFeed, MongoCatalogStore,
    RedisSnapshotCache, handlers,
};
use std::time::Duration;

use crate::config::SourceMode;
use crate::state::AppState;

/// Create the products router for the configured source mode
pub async fn router(state: &AppState) -> eyre::Result<Router> {
    let catalog = &state.config.catalog;

    let feed = HttpProductFeed::new(
        catalog.upstream_url.as_str(),
        Duration::from_secs(catalog.upstream_timeout_secs),
    )?;

    match catalog.source {
        SourceMode::Database => {
            let mongo_cfg = state
                .config
                .mongodb
                .as_ref()
                .ok_or_else(|| eyre::eyre!("database mode requires MongoDB configuration"))?;
            let client = state
                .mongo
                .as_ref()
                .ok_or_else(|| eyre::eyre!("database mode requires a MongoDB connection"))?;

            let db = client.database(mongo_cfg.database());
            let store = MongoCatalogStore::new(&db);
            store.init_indexes().await?;

            let name = store.collection_name();
            let source = DbProductSource::with_name(store, feed, name);
            Ok(handlers::router(CatalogService::new(source)))
        }
        SourceMode::Cache => {
            let conn = state
                .redis
                .as_ref()
                .ok_or_else(|| eyre::eyre!("cache mode requires a Redis connection"))?
                .clone();

            let cache =
                RedisSnapshotCache::new(conn, catalog.cache_key.clone(), catalog.cache_ttl_secs);
            let name = cache.key().to_string();
            let source = CachedProductSource::new(cache, feed, name);
            Ok(handlers::router(CatalogService::new(source)))
        }
    }
}
