use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};
use std::time::Duration;
use tracing::info;

use crate::common::{retry, retry_with_backoff, Error, Result, RetryConfig};
use crate::config::MongoConfig;

/// Connect to MongoDB and return a driver client.
///
/// Parses the connection string rendered from the config, applies pool and
/// timeout settings, then verifies liveness with a `ping` against the `admin`
/// database. A client that cannot ping is reported as
/// [`Error::ConnectionFailed`] instead of being handed back half-dead.
///
/// # Example
/// ```ignore
/// use mongo_express::{connect, MongoConfig};
///
/// let config = MongoConfig::with_credentials("localhost", "user", "pass");
/// let client = connect(&config).await?;
/// let db = client.database("mydb");
/// ```
pub async fn connect(config: &MongoConfig) -> Result<Client> {
    info!(host = %config.host, port = config.port, "Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(config.connection_string()).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Connect with automatic retry on failure.
///
/// Uses exponential backoff with jitter for transient network issues during
/// startup. `None` uses the default retry policy (3 attempts, 100ms initial
/// delay).
///
/// # Example
/// ```ignore
/// use mongo_express::{connect_with_retry, MongoConfig, RetryConfig};
///
/// let config = MongoConfig::new("localhost");
/// let retry = RetryConfig::new().with_max_retries(5).with_initial_delay(500);
/// let client = connect_with_retry(&config, Some(retry)).await?;
/// ```
pub async fn connect_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client> {
    match retry_config {
        Some(retry_config) => retry_with_backoff(|| connect(config), retry_config).await,
        None => retry(|| connect(config)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let host = std::env::var("MONGODB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let result = connect(&MongoConfig::new(host)).await;
        assert!(result.is_ok());
    }
}
