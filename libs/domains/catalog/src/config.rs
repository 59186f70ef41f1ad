use core_config::{env_or_default, env_parse_or, ConfigError, FromEnv};

use crate::document::COLLECTION;
use crate::page::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Catalog settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Collection holding product documents
    pub collection: String,
    /// Page size for requests that do not pick one
    pub default_page_size: u64,
}

impl CatalogConfig {
    /// First page at the configured default size
    pub fn first_page(&self) -> PageRequest {
        PageRequest::of(0, self.default_page_size)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            collection: COLLECTION.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FromEnv for CatalogConfig {
    /// `CATALOG_COLLECTION` (default `products`) and
    /// `CATALOG_DEFAULT_PAGE_SIZE` (default 20, at most 1000)
    fn from_env() -> Result<Self, ConfigError> {
        let default_page_size = env_parse_or("CATALOG_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&default_page_size) {
            return Err(ConfigError::ParseError {
                key: "CATALOG_DEFAULT_PAGE_SIZE".to_string(),
                details: format!("must be between 1 and {MAX_PAGE_SIZE}, got {default_page_size}"),
            });
        }

        Ok(Self {
            collection: env_or_default("CATALOG_COLLECTION", COLLECTION),
            default_page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_config_defaults() {
        temp_env::with_vars_unset(["CATALOG_COLLECTION", "CATALOG_DEFAULT_PAGE_SIZE"], || {
            let config = CatalogConfig::from_env().unwrap();
            assert_eq!(config, CatalogConfig::default());
            assert_eq!(config.collection, "products");
            assert_eq!(config.first_page(), PageRequest::of(0, 20));
        });
    }

    #[test]
    fn test_catalog_config_from_env() {
        temp_env::with_vars(
            [
                ("CATALOG_COLLECTION", Some("catalog_products")),
                ("CATALOG_DEFAULT_PAGE_SIZE", Some("50")),
            ],
            || {
                let config = CatalogConfig::from_env().unwrap();
                assert_eq!(config.collection, "catalog_products");
                assert_eq!(config.default_page_size, 50);
            },
        );
    }

    #[test]
    fn test_catalog_config_rejects_out_of_range_page_size() {
        for value in ["0", "1001", "many"] {
            temp_env::with_var("CATALOG_DEFAULT_PAGE_SIZE", Some(value), || {
                let err = CatalogConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("CATALOG_DEFAULT_PAGE_SIZE"));
            });
        }
    }
}
