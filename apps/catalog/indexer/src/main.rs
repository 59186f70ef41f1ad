//! Catalog indexer
//!
//! Connects to MongoDB, ensures the product indexes exist and reports how
//! many products the catalog holds. Safe to run on every deploy.

use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{connect_with_retry, ensure_healthy};
use domain_catalog::{MongoProductRepository, PageRequest, ProductRepository};
use tracing::{info, warn};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database(), "Connecting to MongoDB");
    let client = connect_with_retry(&config.mongodb, None).await?;
    let db = client.database(config.mongodb.database());

    let health = ensure_healthy(&db).await?;
    info!(response_time_ms = health.response_time_ms, "MongoDB is healthy");

    let repository = MongoProductRepository::from_config(&db, &config.catalog);
    repository.init_indexes().await?;

    let probe = PageRequest::of(0, 1);
    let total = repository.find_all(&probe).await?.total_elements;
    let active = repository.find_by_active(&probe).await?.total_elements;

    if total == 0 {
        warn!(collection = %config.catalog.collection, "Catalog is empty");
    }
    info!(
        collection = %config.catalog.collection,
        total,
        active,
        "Catalog indexes ready"
    );

    Ok(())
}
