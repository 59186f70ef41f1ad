//! MongoDB connection management

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{MongoError, client_options, connect, connect_with_retry};
pub use health::{HealthStatus, check_health_detailed, ensure_healthy};

pub use mongodb::{Client, Collection, Database};
