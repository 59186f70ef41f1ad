use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::Product;
use crate::page::{Page, PageRequest};

/// Catalog store: persistence and lookup of products
///
/// Ids are the hex strings found in [`Product::id`]. A malformed id is
/// treated like an unknown one by the read and delete operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product without an id, or replace (upserting) one that has
    /// an id. New products get an id and any missing timestamps.
    async fn save(&self, product: Product) -> CatalogResult<Product>;

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>>;

    async fn find_all(&self, page: &PageRequest) -> CatalogResult<Page<Product>>;

    /// Products whose `active` flag is `true`
    async fn find_by_active(&self, page: &PageRequest) -> CatalogResult<Page<Product>>;

    /// Deleting an unknown id is not an error
    async fn delete_by_id(&self, id: &str) -> CatalogResult<()>;

    async fn exists_by_id(&self, id: &str) -> CatalogResult<bool>;

    /// Exact category match
    async fn find_by_category(
        &self,
        category: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>>;

    /// Case-insensitive substring match on the name; `fragment` is literal text
    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>>;

    async fn find_by_category_and_name_containing_ignore_case(
        &self,
        category: &str,
        fragment: &str,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>>;
}
