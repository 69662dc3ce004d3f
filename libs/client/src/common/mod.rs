//! Shared error and retry plumbing

pub mod error;
pub mod retry;

pub use error::{Error, Result};
pub use retry::{retry, retry_with_backoff, RetryConfig};
