//! Product sources: where a snapshot comes from and how writes behave
//!
//! Two strategies exist behind one trait. The database-backed source treats
//! the store as authoritative and populates it from the upstream feed once,
//! when empty. The cache-backed source keeps a TTL-bound snapshot in a cache
//! slot and refreshes it from the feed on expiry. Both serialize population
//! behind a per-name lock so an emptiness window triggers at most one remote
//! fetch, with concurrent callers waiting for that result.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::SnapshotCache;
use crate::error::CatalogResult;
use crate::models::{Product, ProductPatch};
use crate::store::ProductStore;
use crate::upstream::ProductFeed;

/// Data provider for the catalog
///
/// `snapshot` yields the current point-in-time collection; the write
/// operations mutate it with strategy-dependent durability (see the
/// implementations).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Current full collection, populating from upstream when needed
    async fn snapshot(&self) -> CatalogResult<Vec<Product>>;

    /// Set one product's price; `None` when the id does not exist
    async fn update_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>>;

    /// Apply patches in listed order and return the full resulting
    /// collection; entries with unknown ids are skipped
    async fn bulk_update(&self, updates: Vec<ProductPatch>) -> CatalogResult<Vec<Product>>;

    /// Drop any cached snapshot so the next read repopulates
    async fn invalidate(&self) -> CatalogResult<()>;
}

/// One async lock per logical cache name.
///
/// Population runs under the lock for its name: losers of the race block
/// here, then re-check state instead of fetching again.
struct KeyedLocks {
    locks: StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    fn new() -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
        }
    }

    fn acquire(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(key, "Recovered from poisoned population lock table");
                poisoned.into_inner()
            }
        };
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// Store-first source: serve the database, populate it from the upstream
/// feed only while it is empty.
///
/// Writes are durable. Ids are assigned sequentially in fetch order at
/// ingestion, mirroring an auto-increment store; an insert that fails leaves
/// a gap and does not abort the rest of the batch.
pub struct DbProductSource<S, F> {
    store: S,
    feed: F,
    flight: KeyedLocks,
    name: String,
}

impl<S: ProductStore, F: ProductFeed> DbProductSource<S, F> {
    pub fn new(store: S, feed: F) -> Self {
        Self::with_name(store, feed, "products")
    }

    /// Use a custom lock name, e.g. the backing collection name
    pub fn with_name(store: S, feed: F, name: impl Into<String>) -> Self {
        Self {
            store,
            feed,
            flight: KeyedLocks::new(),
            name: name.into(),
        }
    }

    async fn populate(&self) -> CatalogResult<()> {
        let fetched = self.feed.fetch().await?;
        info!(
            count = fetched.len(),
            "Populating database from upstream product API"
        );

        let mut inserted = 0usize;
        for (idx, item) in fetched.into_iter().enumerate() {
            let product = Product {
                id: idx as i64 + 1,
                title: item.title,
                price: item.price,
                description: item.description,
                category: item.category,
            };

            match self.store.insert(&product).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    error!(
                        product_id = product.id,
                        error = %e,
                        "Error inserting product into database"
                    );
                }
            }
        }

        info!(inserted, "Product ingestion complete");
        Ok(())
    }
}

#[async_trait]
impl<S: ProductStore, F: ProductFeed> ProductSource for DbProductSource<S, F> {
    #[instrument(skip(self))]
    async fn snapshot(&self) -> CatalogResult<Vec<Product>> {
        if self.store.count().await? > 0 {
            let products = self.store.all().await?;
            debug!(count = products.len(), "Serving products from the database");
            return Ok(products);
        }

        let lock = self.flight.acquire(&self.name);
        let _guard = lock.lock().await;

        // A concurrent request may have populated while we waited
        if self.store.count().await? == 0 {
            self.populate().await?;
        }

        self.store.all().await
    }

    #[instrument(skip(self))]
    async fn update_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>> {
        self.store.set_price(id, price).await
    }

    #[instrument(skip(self, updates), fields(entries = updates.len()))]
    async fn bulk_update(&self, updates: Vec<ProductPatch>) -> CatalogResult<Vec<Product>> {
        let mut skipped = 0usize;

        for patch in &updates {
            match self.store.apply_patch(patch).await {
                Ok(Some(_)) => {}
                // Unknown ids are skipped without raising an error
                Ok(None) => skipped += 1,
                Err(e) => {
                    error!(
                        product_id = patch.id,
                        error = %e,
                        "Error applying bulk update entry"
                    );
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, "Bulk update entries skipped");
        }

        self.store.all().await
    }

    async fn invalidate(&self) -> CatalogResult<()> {
        // A populated store stays populated; resetting it is an external
        // operation
        debug!("Invalidate is a no-op for the database-backed source");
        Ok(())
    }
}

/// Cache-first source: serve the TTL-bound snapshot, refreshing it from the
/// upstream feed when absent or expired.
///
/// Writes in this mode are applied only to the in-memory copy returned for
/// that single response; the cached snapshot is replaced wholesale on the
/// next refresh, never edited in place, and nothing is propagated upstream.
pub struct CachedProductSource<C, F> {
    cache: C,
    feed: F,
    flight: KeyedLocks,
    name: String,
}

impl<C: SnapshotCache, F: ProductFeed> CachedProductSource<C, F> {
    /// `name` is the logical cache name used for the population lock,
    /// normally the cache key itself.
    pub fn new(cache: C, feed: F, name: impl Into<String>) -> Self {
        Self {
            cache,
            feed,
            flight: KeyedLocks::new(),
            name: name.into(),
        }
    }

    async fn refresh(&self) -> CatalogResult<Vec<Product>> {
        let fetched = self.feed.fetch().await?;
        let products: Vec<Product> = fetched.into_iter().map(Product::from).collect();

        self.cache.put(&products).await?;
        info!(
            count = products.len(),
            "Cached products from upstream product API"
        );

        Ok(products)
    }
}

#[async_trait]
impl<C: SnapshotCache, F: ProductFeed> ProductSource for CachedProductSource<C, F> {
    #[instrument(skip(self))]
    async fn snapshot(&self) -> CatalogResult<Vec<Product>> {
        if let Some(products) = self.cache.get().await? {
            return Ok(products);
        }

        let lock = self.flight.acquire(&self.name);
        let _guard = lock.lock().await;

        // A concurrent request may have refreshed while we waited
        if let Some(products) = self.cache.get().await? {
            return Ok(products);
        }

        self.refresh().await
    }

    #[instrument(skip(self))]
    async fn update_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>> {
        let mut products = self.snapshot().await?;

        match products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.price = price;
                info!(
                    product_id = id,
                    price, "Product price updated for this response only"
                );
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, updates), fields(entries = updates.len()))]
    async fn bulk_update(&self, updates: Vec<ProductPatch>) -> CatalogResult<Vec<Product>> {
        let mut products = self.snapshot().await?;
        let mut skipped = 0usize;

        for patch in &updates {
            match products.iter_mut().find(|p| p.id == patch.id) {
                Some(product) => {
                    if let Some(price) = patch.price {
                        product.price = price;
                    }
                    if let Some(ref category) = patch.category {
                        product.category = category.clone();
                    }
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Bulk update entries skipped");
        }

        Ok(products)
    }

    async fn invalidate(&self) -> CatalogResult<()> {
        self.cache.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::upstream::UpstreamProduct;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn upstream_items() -> Vec<UpstreamProduct> {
        vec![
            UpstreamProduct {
                id: 11,
                title: "Apple Phone".to_string(),
                price: 999.0,
                description: "A phone".to_string(),
                category: "electronics".to_string(),
            },
            UpstreamProduct {
                id: 12,
                title: "Banana".to_string(),
                price: 2.0,
                description: "A fruit".to_string(),
                category: "grocery".to_string(),
            },
        ]
    }

    /// Feed fake that counts fetches and can delay to widen race windows
    struct CountingFeed {
        items: Vec<UpstreamProduct>,
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl CountingFeed {
        fn new(items: Vec<UpstreamProduct>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    items,
                    calls: calls.clone(),
                    delay: Duration::ZERO,
                },
                calls,
            )
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ProductFeed for CountingFeed {
        async fn fetch(&self) -> CatalogResult<Vec<UpstreamProduct>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.items.clone())
        }
    }

    /// Store fake over a Vec, with optional per-id insert failures
    #[derive(Default)]
    struct InMemoryStore {
        products: StdMutex<Vec<Product>>,
        fail_insert_ids: Vec<i64>,
    }

    impl InMemoryStore {
        fn with_products(products: Vec<Product>) -> Self {
            Self {
                products: StdMutex::new(products),
                fail_insert_ids: Vec::new(),
            }
        }

        fn failing_inserts(ids: Vec<i64>) -> Self {
            Self {
                products: StdMutex::new(Vec::new()),
                fail_insert_ids: ids,
            }
        }
    }

    #[async_trait]
    impl ProductStore for InMemoryStore {
        async fn count(&self) -> CatalogResult<u64> {
            Ok(self.products.lock().unwrap().len() as u64)
        }

        async fn all(&self) -> CatalogResult<Vec<Product>> {
            let mut products = self.products.lock().unwrap().clone();
            products.sort_by_key(|p| p.id);
            Ok(products)
        }

        async fn get(&self, id: i64) -> CatalogResult<Option<Product>> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn insert(&self, product: &Product) -> CatalogResult<()> {
            if self.fail_insert_ids.contains(&product.id) {
                return Err(CatalogError::Database("duplicate key".to_string()));
            }
            self.products.lock().unwrap().push(product.clone());
            Ok(())
        }

        async fn set_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>> {
            let mut products = self.products.lock().unwrap();
            match products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    product.price = price;
                    Ok(Some(product.clone()))
                }
                None => Ok(None),
            }
        }

        async fn apply_patch(&self, patch: &ProductPatch) -> CatalogResult<Option<Product>> {
            let mut products = self.products.lock().unwrap();
            match products.iter_mut().find(|p| p.id == patch.id) {
                Some(product) => {
                    if let Some(price) = patch.price {
                        product.price = price;
                    }
                    if let Some(ref category) = patch.category {
                        product.category = category.clone();
                    }
                    Ok(Some(product.clone()))
                }
                None => Ok(None),
            }
        }
    }

    /// Cache fake over a single optional snapshot slot
    #[derive(Default)]
    struct InMemoryCache {
        snapshot: StdMutex<Option<Vec<Product>>>,
        puts: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotCache for InMemoryCache {
        async fn get(&self) -> CatalogResult<Option<Vec<Product>>> {
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn put(&self, products: &[Product]) -> CatalogResult<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            *self.snapshot.lock().unwrap() = Some(products.to_vec());
            Ok(())
        }

        async fn clear(&self) -> CatalogResult<()> {
            *self.snapshot.lock().unwrap() = None;
            Ok(())
        }
    }

    fn stored_products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                title: "Apple Phone".to_string(),
                price: 999.0,
                description: "A phone".to_string(),
                category: "electronics".to_string(),
            },
            Product {
                id: 2,
                title: "Banana".to_string(),
                price: 2.0,
                description: "A fruit".to_string(),
                category: "grocery".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_db_source_serves_store_without_fetching() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let source = DbProductSource::new(InMemoryStore::with_products(stored_products()), feed);

        let products = source.snapshot().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_db_source_populates_empty_store_with_sequential_ids() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let source = DbProductSource::new(InMemoryStore::default(), feed);

        let products = source.snapshot().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Upstream ids (11, 12) are discarded in favor of assigned ones
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(products[0].title, "Apple Phone");
    }

    #[tokio::test]
    async fn test_db_source_fetches_once_under_concurrency() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let feed = feed.with_delay(Duration::from_millis(50));
        let source = DbProductSource::new(InMemoryStore::default(), feed);

        let (first, second) = tokio::join!(source.snapshot(), source.snapshot());

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_db_source_skips_failed_inserts() {
        let (feed, _calls) = CountingFeed::new(upstream_items());
        let source = DbProductSource::new(InMemoryStore::failing_inserts(vec![1]), feed);

        let products = source.snapshot().await.unwrap();

        // The first item failed to insert; the rest of the batch survived
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 2);
        assert_eq!(products[0].title, "Banana");
    }

    #[tokio::test]
    async fn test_db_source_update_price_is_durable() {
        let (feed, _calls) = CountingFeed::new(Vec::new());
        let source = DbProductSource::new(InMemoryStore::with_products(stored_products()), feed);

        let updated = source.update_price(2, 3.0).await.unwrap().unwrap();
        assert_eq!(updated.price, 3.0);

        let products = source.snapshot().await.unwrap();
        assert_eq!(products[1].price, 3.0);
    }

    #[tokio::test]
    async fn test_db_source_update_price_unknown_id() {
        let (feed, _calls) = CountingFeed::new(Vec::new());
        let source = DbProductSource::new(InMemoryStore::with_products(stored_products()), feed);

        assert!(source.update_price(99, 3.0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_db_source_bulk_update_skips_unknown_ids() {
        let (feed, _calls) = CountingFeed::new(Vec::new());
        let source = DbProductSource::new(InMemoryStore::with_products(stored_products()), feed);

        let updates = vec![
            ProductPatch {
                id: 2,
                price: Some(3.0),
                category: None,
            },
            ProductPatch {
                id: 7,
                price: Some(5.0),
                category: None,
            },
        ];

        let products = source.bulk_update(updates).await.unwrap();

        // Full collection in order: id 1 untouched, id 2 updated, id 7 ignored
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(products[0].price, 999.0);
        assert_eq!(products[1].price, 3.0);
    }

    #[tokio::test]
    async fn test_cached_source_hit_bypasses_feed() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let cache = InMemoryCache::default();
        *cache.snapshot.lock().unwrap() = Some(stored_products());
        let source = CachedProductSource::new(cache, feed, "catalog:products");

        let products = source.snapshot().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cached_source_miss_fetches_once_and_writes_through() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let source = CachedProductSource::new(InMemoryCache::default(), feed, "catalog:products");

        let first = source.snapshot().await.unwrap();
        let second = source.snapshot().await.unwrap();

        // One remote fetch serves both reads within the TTL window
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.cache.puts.load(Ordering::SeqCst), 1);
        // Cache mode keeps upstream ids
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![11, 12]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once_under_concurrency() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let feed = feed.with_delay(Duration::from_millis(50));
        let source = CachedProductSource::new(InMemoryCache::default(), feed, "catalog:products");

        let (first, second) = tokio::join!(source.snapshot(), source.snapshot());

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_source_update_price_is_session_only() {
        let (feed, _calls) = CountingFeed::new(upstream_items());
        let source = CachedProductSource::new(InMemoryCache::default(), feed, "catalog:products");

        let updated = source.update_price(12, 3.0).await.unwrap().unwrap();
        assert_eq!(updated.price, 3.0);

        // The cached snapshot was not touched
        let products = source.snapshot().await.unwrap();
        let banana = products.iter().find(|p| p.id == 12).unwrap();
        assert_eq!(banana.price, 2.0);
    }

    #[tokio::test]
    async fn test_cached_source_bulk_update_is_session_only_and_skips_unknown() {
        let (feed, _calls) = CountingFeed::new(upstream_items());
        let source = CachedProductSource::new(InMemoryCache::default(), feed, "catalog:products");

        let updates = vec![
            ProductPatch {
                id: 12,
                price: Some(3.0),
                category: Some("produce".to_string()),
            },
            ProductPatch {
                id: 7,
                price: Some(5.0),
                category: None,
            },
        ];

        let products = source.bulk_update(updates).await.unwrap();
        let banana = products.iter().find(|p| p.id == 12).unwrap();
        assert_eq!(banana.price, 3.0);
        assert_eq!(banana.category, "produce");

        // Untouched record is returned as well
        assert!(products.iter().any(|p| p.id == 11));

        // The cached snapshot still holds the original values
        let snapshot = source.snapshot().await.unwrap();
        assert_eq!(snapshot.iter().find(|p| p.id == 12).unwrap().price, 2.0);
    }

    #[tokio::test]
    async fn test_cached_source_invalidate_forces_refetch() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let source = CachedProductSource::new(InMemoryCache::default(), feed, "catalog:products");

        source.snapshot().await.unwrap();
        source.invalidate().await.unwrap();
        source.snapshot().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_db_source_invalidate_is_noop() {
        let (feed, calls) = CountingFeed::new(upstream_items());
        let source = DbProductSource::new(InMemoryStore::with_products(stored_products()), feed);

        source.invalidate().await.unwrap();
        let products = source.snapshot().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
