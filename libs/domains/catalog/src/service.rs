//! Catalog Service - stock rules applied on top of the repository

use std::sync::Arc;
use tracing::{debug, instrument};
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduct, Product, ProductQuery};
use crate::page::{Page, PageRequest};
use crate::repository::ProductRepository;

/// Product operations that combine repository access with the
/// [`Product`] stock rules
pub struct CatalogService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and store a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        input.validate()?;
        self.repository.save(Product::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> CatalogResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Page through products matching `query`
    ///
    /// Blank filter values are ignored.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &ProductQuery,
        page: &PageRequest,
    ) -> CatalogResult<Page<Product>> {
        let category = non_blank(query.category.as_deref());
        let name = non_blank(query.name.as_deref());

        match (category, name) {
            (Some(category), Some(name)) => {
                self.repository
                    .find_by_category_and_name_containing_ignore_case(category, name, page)
                    .await
            }
            (Some(category), None) => self.repository.find_by_category(category, page).await,
            (None, Some(name)) => {
                self.repository
                    .find_by_name_containing_ignore_case(name, page)
                    .await
            }
            (None, None) => self.repository.find_all(page).await,
        }
    }

    /// Page through products flagged active
    #[instrument(skip(self))]
    pub async fn list_active_products(&self, page: &PageRequest) -> CatalogResult<Page<Product>> {
        self.repository.find_by_active(page).await
    }

    /// Take `quantity` units out of stock and persist the result
    #[instrument(skip(self))]
    pub async fn reduce_stock(&self, id: &str, quantity: i32) -> CatalogResult<Product> {
        let mut product = self.get_product(id).await?;
        product.reduce_stock(quantity)?;
        self.repository.save(product).await
    }

    /// Add `quantity` units to stock and persist the result
    ///
    /// The stored product is returned unchanged when the increase is a no-op.
    #[instrument(skip(self))]
    pub async fn increase_stock(&self, id: &str, quantity: i32) -> CatalogResult<Product> {
        let mut product = self.get_product(id).await?;
        if !product.increase_stock(quantity) {
            debug!(stock = ?product.stock, "Stock increase ignored");
            return Ok(product);
        }
        self.repository.save(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> CatalogResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        self.repository.delete_by_id(id).await
    }
}

impl<R: ProductRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
