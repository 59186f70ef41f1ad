//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::MongoConfig;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::config::CatalogConfig;
use crate::document::{fields, parse_id, sort_field_name, ProductDocument};
use crate::error::{CatalogError, CatalogResult};
use crate::models::Product;
use crate::page::{Direction, Page, PageRequest, Sort};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Repository over the default `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, crate::document::COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    pub fn from_config(db: &Database, config: &CatalogConfig) -> Self {
        Self::with_collection(db, &config.collection)
    }

    /// Connect (with retry) and open the configured collection
    pub async fn connect(mongo: &MongoConfig, config: &CatalogConfig) -> CatalogResult<Self> {
        let client = database::mongodb::connect_with_retry(mongo, None).await?;
        Ok(Self::from_config(&client.database(mongo.database()), config))
    }

    /// Create the name, category and active indexes
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let indexes = [
            ("idx_name", fields::NAME),
            ("idx_category", fields::CATEGORY),
            ("idx_active", fields::ACTIVE),
        ]
        .into_iter()
        .map(|(name, field)| {
            IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        });

        self.collection.create_indexes(indexes).await?;
        info!(collection = %self.collection.name(), "Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<ProductDocument> {
        &self.collection
    }

    fn id_filter(id: ObjectId) -> Document {
        doc! { fields::ID: id }
    }

    fn active_filter() -> Document {
        doc! { fields::ACTIVE: true }
    }

    fn category_filter(category: &str) -> Document {
        doc! { fields::CATEGORY: category }
    }

    fn name_filter(fragment: &str) -> Document {
        doc! {
            fields::NAME: {
                "$regex": regex::escape(fragment),
                "$options": "i",
            }
        }
    }

    fn category_and_name_filter(category: &str, fragment: &str) -> Document {
        let mut filter = Self::category_filter(category);
        filter.extend(Self::name_filter(fragment));
        filter
    }

    /// Sort keys in request order with `_id` as the final tie-breaker.
    /// Unsorted requests get newest first.
    fn sort_document(sort: &Sort) -> Document {
        if sort.is_unsorted() {
            return doc! { fields::CREATED_AT: -1, fields::ID: -1 };
        }

        let mut document = Document::new();
        for order in sort.orders() {
            let direction = match order.direction {
                Direction::Asc => 1,
                Direction::Desc => -1,
            };
            let field = sort_field_name(order.field);
            if !document.contains_key(field) {
                document.insert(field, direction);
            }
        }
        document.insert(fields::ID, 1);
        document
    }

    async fn find_page(&self, filter: Document, page: &PageRequest) -> CatalogResult<Page<Product>> {
        page.validate()?;
        let limit = i64::try_from(page.size)
            .map_err(|_| CatalogError::Validation(format!("page size {} too large", page.size)))?;

        let total = self.collection.count_documents(filter.clone()).await?;
        if page.offset() >= total {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let options = FindOptions::builder()
            .skip(page.offset())
            .limit(limit)
            .sort(Self::sort_document(&page.sort))
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(Page::new(
            documents.into_iter().map(Product::from).collect(),
            page,
            total,
        ))
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = ?product.id))]
    async fn save(&self, mut product: Product) -> CatalogResult<Product> {
        if let Some(id) = product.id.as_deref() {
            let id = parse_id(id)?;
            let document = ProductDocument::try_from(product)?;

            self.collection
                .replace_one(Self::id_filter(id), &document)
                .upsert(true)
                .await?;

            info!(product_id = %id, "Product saved");
            return Ok(Product::from(document));
        }

        // Stamp in stored precision so the result equals a later read.
        let now = mongodb::bson::DateTime::now().to_chrono();
        product.created_at.get_or_insert(now);
        product.updated_at.get_or_insert(now);

        let mut document = ProductDocument::try_from(product)?;
        let id = ObjectId::new();
        document.id = Some(id);

        self.collection.insert_one(&document).await?;

        info!(product_id = %id, "Product created successfully");
        Ok(Product::from(document))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        let Ok(id) = parse_id(id) else {
            debug!("Malformed product id, nothing to find");
            return Ok(None);
        };

        let document = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, page: &PageRequest) -> CatalogResult<Page<Product>> {
        self.find_page(Document::new(), page).await
    }

    #[instrument(skip(self))]
    async fn find_by_active(&self, page: &PageRequest) -> CatalogResult<Page<Product>> {
        self.find_page(Self::active_filter(), page).await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> CatalogResult<()> {
        let Ok(id) = parse_id(id) else {
            debug!("Malformed product id, nothing to delete");
            return Ok(());
        };

        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        info!(product_id = %id, deleted = result.deleted_count, "Product delete processed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists_by_id(&self, id: &str) -> CatalogResult<bool> {
        let Ok(id) = parse_id(id) else {
            return Ok(false);
        };

        let count = self
            .collection
            .count_documents(Self::id_filter(id))
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_category(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>> {
        self.find_page(Self::category_filter(category), page).await
    }

    #[instrument(skip(self))]
    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>> {
        self.find_page(Self::name_filter(fragment), page).await
    }

    #[instrument(skip(self))]
    async fn find_by_category_and_name_containing_ignore_case(
        &self,
        category: &str,
        fragment: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>> {
        self.find_page(Self::category_and_name_filter(category, fragment), page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::SortField;
    use mongodb::Client;

    // The driver connects lazily, so this never touches the network.
    async fn offline_repository() -> MongoProductRepository {
        let client = Client::with_uri_str("mongodb://127.0.0.1:1").await.unwrap();
        MongoProductRepository::new(&client.database("catalog_offline"))
    }

    #[test]
    fn test_active_filter() {
        assert_eq!(MongoProductRepository::active_filter(), doc! { "active": true });
    }

    #[test]
    fn test_category_filter_is_exact() {
        assert_eq!(
            MongoProductRepository::category_filter("kitchen"),
            doc! { "category": "kitchen" }
        );
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let filter = MongoProductRepository::name_filter("lamp");
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "lamp");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_name_filter_escapes_regex_metacharacters() {
        let filter = MongoProductRepository::name_filter("c++ (x.y)*");
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"c\+\+ \(x\.y\)\*");
    }

    #[test]
    fn test_category_and_name_filter() {
        let filter = MongoProductRepository::category_and_name_filter("kitchen", "Kettle");
        assert_eq!(filter.get_str("category").unwrap(), "kitchen");
        assert!(filter.get_document("name").is_ok());
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_sort_document_unsorted_is_newest_first() {
        assert_eq!(
            MongoProductRepository::sort_document(&Sort::unsorted()),
            doc! { "createdAt": -1, "_id": -1 }
        );
    }

    #[test]
    fn test_sort_document_keeps_order_and_adds_tie_breaker() {
        let sort = Sort::by(SortField::Price, Direction::Desc)
            .and(SortField::Name, Direction::Asc)
            .and(SortField::Price, Direction::Asc);

        let document = MongoProductRepository::sort_document(&sort);

        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, ["price", "name", "_id"]);
        assert_eq!(document.get_i32("price").unwrap(), -1);
        assert_eq!(document.get_i32("name").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_page_rejected_before_query() {
        let repository = offline_repository().await;

        let result = repository.find_all(&PageRequest::of(0, 0)).await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_ids_short_circuit() {
        let repository = offline_repository().await;

        assert!(repository.find_by_id("nope").await.unwrap().is_none());
        assert!(!repository.exists_by_id("nope").await.unwrap());
        repository.delete_by_id("nope").await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_malformed_id() {
        let repository = offline_repository().await;
        let product = Product {
            id: Some("nope".to_string()),
            ..Default::default()
        };

        let result = repository.save(product).await;

        assert!(matches!(result, Err(CatalogError::InvalidId(_))));
    }
}
