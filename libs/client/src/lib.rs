//! A convenience client over the official MongoDB Rust driver.
//!
//! This crate does not implement a wire protocol, a connection pool, or a
//! query planner — all of that stays in the wrapped driver. What it adds is a
//! thinner call surface: name-based database and collection lookup, id-based
//! document retrieval, and one-call CRUD verbs over plain BSON documents.
//!
//! # Examples
//!
//! ```ignore
//! use mongo_express::{Client, MongoConfig, doc};
//!
//! let config = MongoConfig::with_credentials("db.example.com", "user", "secret");
//! let client = Client::connect(&config).await?;
//!
//! let id = client
//!     .create_entry(doc! { "name": "probe-1" }, "probes", "telemetry")
//!     .await?;
//! let entry = client.entry_by_id(id, "probes", Some("telemetry")).await?;
//! ```
//!
//! Queries can be assembled with the fluent [`Query`] builder:
//!
//! ```
//! use mongo_express::Query;
//!
//! let filter = Query::new()
//!     .with_value("status", "active")
//!     .with_range("score", 0.2, 0.8)
//!     .key_exists("meta.starttime")
//!     .into_document();
//! ```

pub mod client;
pub mod common;
pub mod config;
pub mod connector;
pub mod document;
pub mod health;
pub mod query;

pub use client::{Client, EntryId};
pub use common::{Error, Result, RetryConfig};
pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry};
pub use document::deep_get;
pub use health::{check_health, check_health_detailed, HealthStatus};
pub use query::Query;

// Re-export driver types callers will hold and the `doc!` macro for filters
pub use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
pub use mongodb::{Collection, Database};
