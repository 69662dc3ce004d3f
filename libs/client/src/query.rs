//! Fluent builder for BSON filter documents.

use mongodb::bson::{doc, Bson, Document};

use crate::client::EntryId;

/// A fluent builder over a BSON filter document.
///
/// Each method narrows the filter; [`into_document`](Query::into_document)
/// (or `From<Query> for Document`) yields the filter to pass to a find.
///
/// # Example
///
/// ```
/// use mongo_express::{doc, Query};
///
/// let filter = Query::new()
///     .with_value("object.side", "left")
///     .with_range("object.angle", 30, 60)
///     .key_exists("meta.starttime")
///     .into_document();
///
/// assert_eq!(filter.get_document("object.angle").unwrap().get("$gte"), Some(&30.into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    filter: Document,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match documents where `key` equals `value`
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Match documents where `key` is within `[min, max]`, inclusive
    pub fn with_range(
        mut self,
        key: impl Into<String>,
        min: impl Into<Bson>,
        max: impl Into<Bson>,
    ) -> Self {
        self.filter.insert(
            key.into(),
            doc! { "$gte": min.into(), "$lte": max.into() },
        );
        self
    }

    /// Match documents whose `_id` is one of `ids`
    pub fn with_ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntryId>,
    {
        let ids: Vec<Bson> = ids.into_iter().map(|id| id.into().into_bson()).collect();
        self.filter.insert("_id", doc! { "$in": ids });
        self
    }

    /// Match documents where `key` is present
    pub fn key_exists(self, key: impl Into<String>) -> Self {
        self.set_exists(key.into(), true)
    }

    /// Match documents where `key` is absent
    pub fn key_missing(self, key: impl Into<String>) -> Self {
        self.set_exists(key.into(), false)
    }

    // Merges $exists into an existing operator sub-document for the key, so
    // `with_range(k, ..).key_exists(k)` keeps the range bounds.
    fn set_exists(mut self, key: String, exists: bool) -> Self {
        match self.filter.get_document_mut(&key) {
            Ok(operators) => {
                operators.insert("$exists", exists);
            }
            Err(_) => {
                self.filter.insert(key, doc! { "$exists": exists });
            }
        }
        self
    }

    /// The built filter document
    pub fn into_document(self) -> Document {
        self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }
}

impl From<Query> for Document {
    fn from(query: Query) -> Self {
        query.into_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_empty_query() {
        let query = Query::new();
        assert!(query.is_empty());
        assert!(query.into_document().is_empty());
    }

    #[test]
    fn test_with_value() {
        let filter = Query::new()
            .with_value("name", "test")
            .with_value("quantity", 3)
            .into_document();

        assert_eq!(filter.get_str("name").unwrap(), "test");
        assert_eq!(filter.get_i32("quantity").unwrap(), 3);
    }

    #[test]
    fn test_with_range() {
        let filter = Query::new().with_range("angle", 30.0, 60.0).into_document();

        let bounds = filter.get_document("angle").unwrap();
        assert_eq!(bounds.get_f64("$gte").unwrap(), 30.0);
        assert_eq!(bounds.get_f64("$lte").unwrap(), 60.0);
    }

    #[test]
    fn test_with_ids_mixes_id_shapes() {
        let oid = ObjectId::new();
        let filter = Query::new()
            .with_ids([EntryId::from(oid), EntryId::from("order-42")])
            .into_document();

        let ids = filter
            .get_document("_id")
            .unwrap()
            .get_array("$in")
            .unwrap();
        assert_eq!(ids[0], Bson::ObjectId(oid));
        assert_eq!(ids[1], Bson::String("order-42".to_string()));
    }

    #[test]
    fn test_key_exists() {
        let filter = Query::new().key_exists("meta.starttime").into_document();
        let operators = filter.get_document("meta.starttime").unwrap();
        assert_eq!(operators.get_bool("$exists").unwrap(), true);
    }

    #[test]
    fn test_key_missing() {
        let filter = Query::new().key_missing("deleted_at").into_document();
        let operators = filter.get_document("deleted_at").unwrap();
        assert_eq!(operators.get_bool("$exists").unwrap(), false);
    }

    #[test]
    fn test_exists_merges_with_range() {
        let filter = Query::new()
            .with_range("score", 1, 10)
            .key_exists("score")
            .into_document();

        let operators = filter.get_document("score").unwrap();
        assert_eq!(operators.get_i32("$gte").unwrap(), 1);
        assert_eq!(operators.get_i32("$lte").unwrap(), 10);
        assert_eq!(operators.get_bool("$exists").unwrap(), true);
    }

    #[test]
    fn test_exists_overwrites_scalar_value() {
        // An equality match is not an operator document; $exists replaces it
        let filter = Query::new()
            .with_value("name", "test")
            .key_exists("name")
            .into_document();

        let operators = filter.get_document("name").unwrap();
        assert_eq!(operators.get_bool("$exists").unwrap(), true);
    }
}
