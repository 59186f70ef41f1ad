/// Backend-independent database error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// MongoDB driver errors
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(feature = "mongodb")]
impl From<crate::mongodb::MongoError> for DatabaseError {
    fn from(err: crate::mongodb::MongoError) -> Self {
        match err {
            crate::mongodb::MongoError::Mongo(e) => DatabaseError::Mongo(e),
            crate::mongodb::MongoError::ConnectionFailed(msg) => DatabaseError::ConnectionFailed(msg),
        }
    }
}
