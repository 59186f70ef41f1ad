use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Insufficient stock: available {}, requested {requested}", display_stock(.available))]
    InsufficientStock {
        available: Option<i32>,
        requested: i32,
    },

    #[error("Stock quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid product id: {0}")]
    InvalidId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn display_stock(stock: &Option<i32>) -> String {
    stock.map_or_else(|| "unknown".to_string(), |s| s.to_string())
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<database::mongodb::MongoError> for CatalogError {
    fn from(err: database::mongodb::MongoError) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for CatalogError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for CatalogError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

impl From<rust_decimal::Error> for CatalogError {
    fn from(err: rust_decimal::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
