/// Error type for client operations.
///
/// The wrapped driver already has a full error taxonomy; operations pass it
/// through untouched via the `Mongo` variant. The only error added here is
/// the startup liveness check.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;
