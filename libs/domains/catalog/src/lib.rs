//! Catalog Domain
//!
//! Product catalog data access backed by MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Stock rules applied to stored products
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Catalog store (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Document   │  ← Product <-> persisted document mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product entity, paging types
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{CatalogConfig, CatalogService, MongoProductRepository, PageRequest};
//! use database::mongodb::MongoConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mongo = MongoConfig::with_database("mongodb://localhost:27017", "catalog");
//! let repository = MongoProductRepository::connect(&mongo, &CatalogConfig::default()).await?;
//! repository.init_indexes().await?;
//!
//! let service = CatalogService::new(repository);
//! let available = service.list_active_products(&PageRequest::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod mongodb;
pub mod page;
pub mod repository;
pub mod service;

pub use config::CatalogConfig;
pub use document::ProductDocument;
pub use error::{CatalogError, CatalogResult};
pub use models::{NewProduct, Product, ProductQuery};
pub use self::mongodb::MongoProductRepository;
pub use page::{Direction, Page, PageRequest, Sort, SortField, SortOrder};
pub use repository::ProductRepository;
pub use service::CatalogService;
