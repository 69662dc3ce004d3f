//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for
//! integration tests.

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup.
///
/// The container is automatically stopped and removed when this struct is
/// dropped.
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    host: String,
    port: u16,
}

impl TestMongo {
    /// Start a MongoDB container and wait for it to accept connections.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestMongo;
    ///
    /// # async fn example() {
    /// let mongo = TestMongo::new().await;
    /// let client = mongo.client().await;
    /// # }
    /// ```
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get host port");

        tracing::info!(port, "Test MongoDB ready");

        Self {
            container,
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `mongodb://` connection string for the running container
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}:{}/", self.host, self.port)
    }

    /// A driver client connected to the running container
    pub async fn client(&self) -> mongodb::Client {
        mongodb::Client::with_uri_str(self.connection_string())
            .await
            .expect("Failed to connect to test MongoDB")
    }
}

// Container is automatically cleaned up when TestMongo is dropped
impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
