//! Helpers for working with nested BSON documents.

use mongodb::bson::{Bson, Document};

/// Look up a value in a nested document by dotted path.
///
/// Returns `None` when any path segment is missing or when an intermediate
/// value is not a document.
///
/// # Example
///
/// ```
/// use mongo_express::{deep_get, doc, Bson};
///
/// let entry = doc! { "meta": { "station": { "name": "C" } } };
/// assert_eq!(
///     deep_get(&entry, "meta.station.name"),
///     Some(&Bson::String("C".to_string()))
/// );
/// assert_eq!(deep_get(&entry, "meta.missing"), None);
/// ```
pub fn deep_get<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        match current {
            Bson::Document(nested) => current = nested.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_deep_get_top_level() {
        let entry = doc! { "name": "test" };
        assert_eq!(
            deep_get(&entry, "name"),
            Some(&Bson::String("test".to_string()))
        );
    }

    #[test]
    fn test_deep_get_nested() {
        let entry = doc! { "object": { "angle": 45 } };
        assert_eq!(deep_get(&entry, "object.angle"), Some(&Bson::Int32(45)));
    }

    #[test]
    fn test_deep_get_missing_segment() {
        let entry = doc! { "object": { "angle": 45 } };
        assert_eq!(deep_get(&entry, "object.side"), None);
        assert_eq!(deep_get(&entry, "missing.angle"), None);
    }

    #[test]
    fn test_deep_get_non_document_intermediate() {
        let entry = doc! { "object": 3 };
        assert_eq!(deep_get(&entry, "object.angle"), None);
    }
}
