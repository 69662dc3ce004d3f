//! Shared test utilities.
//!
//! This crate provides reusable test infrastructure:
//! - `TestMongo`: MongoDB container with automatic cleanup
//! - `TestDataBuilder`: deterministic test data generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let client = mongo.client().await;
//!
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let entry = builder.entry("main");
//! }
//! ```

mod mongo;

pub use mongo::TestMongo;

use mongodb::bson::{doc, oid::ObjectId, Document};

/// Builder for test data with deterministic randomization.
///
/// Seeding from the test name keeps test data reproducible across runs while
/// staying distinct between tests.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_entry");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a deterministic ObjectId for testing
    pub fn object_id(&self) -> ObjectId {
        let seed_bytes = self.seed.to_le_bytes();
        let mut bytes = [0u8; 12];
        bytes[..8].copy_from_slice(&seed_bytes);
        bytes[8..12].copy_from_slice(&seed_bytes[..4]);
        ObjectId::from_bytes(bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("collection", "main");
    /// // Returns: "test-collection-12345-main"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A sample document entry, unique to this builder's seed
    pub fn entry(&self, suffix: &str) -> Document {
        doc! {
            "name": self.name("entry", suffix),
            "description": "generated by TestDataBuilder",
            "seed": self.seed as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.object_id(), builder2.object_id());
        assert_eq!(builder1.entry("main"), builder2.entry("main"));
    }

    #[test]
    fn test_data_builder_from_name() {
        let builder1 = TestDataBuilder::from_test_name("my_test");
        let builder2 = TestDataBuilder::from_test_name("my_test");

        assert_eq!(builder1.object_id(), builder2.object_id());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.object_id(), builder2.object_id());
    }
}
