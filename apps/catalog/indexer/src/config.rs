use core_config::FromEnv;
use database::mongodb::MongoConfig;
use domain_catalog::CatalogConfig;

pub use core_config::Environment;

/// Indexer configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub catalog: CatalogConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            mongodb: MongoConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("shop")),
                ("CATALOG_COLLECTION", Some("items")),
                ("CATALOG_DEFAULT_PAGE_SIZE", None),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "shop");
                assert_eq!(config.catalog.collection, "items");
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_config_rejects_bad_page_size() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("shop")),
                ("CATALOG_DEFAULT_PAGE_SIZE", Some("0")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("CATALOG_DEFAULT_PAGE_SIZE"));
            },
        );
    }
}
