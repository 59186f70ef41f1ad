use mongodb::{Database, bson::doc};
use std::time::Instant;
use tracing::warn;

use crate::common::{DatabaseError, DatabaseResult};

/// Result of a MongoDB health probe
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping `db` and report latency and any error
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let outcome = db.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

/// Probe `db` and fail with [`DatabaseError::HealthCheckFailed`] when it does not answer
pub async fn ensure_healthy(db: &Database) -> DatabaseResult<HealthStatus> {
    let status = check_health_detailed(db).await;
    if status.healthy {
        return Ok(status);
    }

    let message = status.message.unwrap_or_default();
    warn!(database = %db.name(), error = %message, "MongoDB health check failed");
    Err(DatabaseError::HealthCheckFailed(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client.database("catalog")).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }

    #[tokio::test]
    async fn test_ensure_healthy_reports_unreachable_server() {
        let client = Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
            .await
            .unwrap();

        let result = ensure_healthy(&client.database("catalog")).await;

        assert!(matches!(result, Err(DatabaseError::HealthCheckFailed(msg)) if !msg.is_empty()));
        assert!(!check_health_detailed(&client.database("catalog")).await.healthy);
    }
}
