//! Snapshot cache for the cache-first source
//!
//! One named slot holds the serialized full product set with a fixed TTL.
//! The entry is written whole and replaced whole; it is never edited in
//! place. Expiry is enforced by the key's TTL and observed lazily on the
//! next read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::CatalogResult;
use crate::models::Product;

/// Default Redis key for the catalog snapshot
pub const DEFAULT_CACHE_KEY: &str = "catalog:products";

/// Default snapshot lifetime in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// The cached value: one point-in-time collection plus its fetch timestamp
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub products: Vec<Product>,
}

/// Storage interface for the catalog snapshot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Current snapshot, `None` when absent or expired
    async fn get(&self) -> CatalogResult<Option<Vec<Product>>>;

    /// Replace the snapshot wholesale, restarting its TTL
    async fn put(&self, products: &[Product]) -> CatalogResult<()>;

    /// Explicit invalidation hook: drop the snapshot immediately
    async fn clear(&self) -> CatalogResult<()>;
}

/// Redis-backed snapshot cache
#[derive(Clone)]
pub struct RedisSnapshotCache {
    redis: ConnectionManager,
    key: String,
    ttl_secs: u64,
}

impl RedisSnapshotCache {
    pub fn new(redis: ConnectionManager, key: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            redis,
            key: key.into(),
            ttl_secs,
        }
    }

    /// Cache key, used by callers as the population lock name
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn get(&self) -> CatalogResult<Option<Vec<Product>>> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.get(&self.key).await?;

        match raw {
            Some(raw) => {
                let snapshot: CachedSnapshot = serde_json::from_str(&raw)?;
                debug!(
                    count = snapshot.products.len(),
                    fetched_at = %snapshot.fetched_at,
                    "Serving products from cache"
                );
                Ok(Some(snapshot.products))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, products), fields(key = %self.key, count = products.len()))]
    async fn put(&self, products: &[Product]) -> CatalogResult<()> {
        let snapshot = CachedSnapshot {
            fetched_at: Utc::now(),
            products: products.to_vec(),
        };
        let raw = serde_json::to_string(&snapshot)?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&self.key, raw, self.ttl_secs).await?;

        Ok(())
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn clear(&self) -> CatalogResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(&self.key).await?;
        debug!("Catalog snapshot invalidated");
        Ok(())
    }
}
