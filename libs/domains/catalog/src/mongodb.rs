//! MongoDB implementation of ProductStore

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::CatalogResult;
use crate::models::{Product, ProductPatch};
use crate::store::ProductStore;

/// MongoDB implementation of the ProductStore
pub struct MongoCatalogStore {
    collection: Collection<Product>,
}

impl MongoCatalogStore {
    /// Create a new MongoCatalogStore over the default `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, "products")
    }

    /// Create a new MongoCatalogStore with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Name of the backing collection, used as the population lock key
    pub fn collection_name(&self) -> String {
        self.collection.name().to_string()
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let indexes = vec![
            // Unique product id
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            // Category lookups
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            // Price range queries
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Catalog indexes created successfully");
        Ok(())
    }

    /// Build the `$set` document for a patch; empty when no field is present
    fn patch_document(patch: &ProductPatch) -> mongodb::bson::Document {
        let mut set = doc! {};

        if let Some(price) = patch.price {
            set.insert("price", price);
        }

        if let Some(ref category) = patch.category {
            set.insert("category", category);
        }

        set
    }
}

#[async_trait]
impl ProductStore for MongoCatalogStore {
    #[instrument(skip(self))]
    async fn count(&self) -> CatalogResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> CatalogResult<Vec<Product>> {
        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "id": 1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> CatalogResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "id": id }).await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn insert(&self, product: &Product) -> CatalogResult<()> {
        self.collection.insert_one(product).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_price(&self, id: i64, price: f64) -> CatalogResult<Option<Product>> {
        let updated = self
            .collection
            .find_one_and_update(doc! { "id": id }, doc! { "$set": { "price": price } })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = id, price, "Product price updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self, patch), fields(product_id = patch.id))]
    async fn apply_patch(&self, patch: &ProductPatch) -> CatalogResult<Option<Product>> {
        let set = Self::patch_document(patch);

        // A patch with no fields present leaves the record untouched
        if set.is_empty() {
            return self.get(patch.id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "id": patch.id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}
