//! The simplified CRUD surface over a driver client.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client as MongoClient, Collection, Database};
use tracing::{debug, info, instrument, warn};

use crate::common::{Result, RetryConfig};
use crate::config::MongoConfig;
use crate::connector;

/// Databases skipped when searching for a collection by name only
const INTERNAL_DATABASES: [&str; 2] = ["config", "local"];

/// A document `_id` in any of the shapes callers hold it in.
///
/// Strings that parse as 24-hex ObjectIds become ObjectIds; any other string
/// is used verbatim, since documents may carry non-ObjectId ids.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryId {
    ObjectId(ObjectId),
    Other(Bson),
}

impl EntryId {
    pub fn into_bson(self) -> Bson {
        match self {
            Self::ObjectId(oid) => Bson::ObjectId(oid),
            Self::Other(bson) => bson,
        }
    }
}

impl From<ObjectId> for EntryId {
    fn from(oid: ObjectId) -> Self {
        Self::ObjectId(oid)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        match ObjectId::parse_str(s) {
            Ok(oid) => Self::ObjectId(oid),
            Err(_) => Self::Other(Bson::String(s.to_string())),
        }
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Bson> for EntryId {
    fn from(bson: Bson) -> Self {
        Self::Other(bson)
    }
}

/// Convenience client wrapping a [`mongodb::Client`].
///
/// Lookup methods report absence as `Ok(None)`/`Ok(false)` with a warn log;
/// driver failures surface as `Err` untouched. Databases and collections
/// named by write operations are created implicitly by the server.
///
/// Cloning is cheap: the wrapped driver client shares its connection pool.
#[derive(Clone)]
pub struct Client {
    inner: MongoClient,
}

impl Client {
    /// Connect using the given configuration.
    ///
    /// Verifies liveness with a `ping` before returning, so an unreachable or
    /// misconfigured server fails here rather than on the first operation.
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let inner = connector::connect(config).await?;
        Ok(Self { inner })
    }

    /// Connect with startup retry; see [`connect_with_retry`](crate::connect_with_retry)
    pub async fn connect_with_retry(
        config: &MongoConfig,
        retry_config: Option<RetryConfig>,
    ) -> Result<Self> {
        let inner = connector::connect_with_retry(config, retry_config).await?;
        Ok(Self { inner })
    }

    /// Wrap an already-connected driver client
    pub fn from_driver(inner: MongoClient) -> Self {
        Self { inner }
    }

    /// The wrapped driver client, for operations this surface does not cover
    pub fn inner(&self) -> &MongoClient {
        &self.inner
    }

    /// Check whether a database with the given name exists on the server
    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        let names = self.inner.list_database_names().await?;
        Ok(names.iter().any(|n| n == name))
    }

    /// Retrieve a database handle by name, if the database exists
    pub async fn database(&self, name: &str) -> Result<Option<Database>> {
        if self.database_exists(name).await? {
            Ok(Some(self.inner.database(name)))
        } else {
            warn!("Database '{}' does not exist", name);
            Ok(None)
        }
    }

    /// Check whether a collection exists, in the given database or in any
    /// database on the server when `database` is `None`.
    pub async fn collection_exists(
        &self,
        collection: &str,
        database: Option<&str>,
    ) -> Result<bool> {
        match database {
            Some(db_name) => {
                let Some(db) = self.database(db_name).await? else {
                    warn!(
                        "Database '{}' does not exist, cannot check for collection '{}'",
                        db_name, collection
                    );
                    return Ok(false);
                };
                let exists = db.list_collection_names().await?.iter().any(|n| n == collection);
                if exists {
                    debug!("Collection '{}' exists in database '{}'", collection, db_name);
                } else {
                    warn!(
                        "Collection '{}' does not exist in database '{}'",
                        collection, db_name
                    );
                }
                Ok(exists)
            }
            None => {
                for db_name in self.inner.list_database_names().await? {
                    let names = self.inner.database(&db_name).list_collection_names().await?;
                    if names.iter().any(|n| n == collection) {
                        debug!("Collection '{}' exists in database '{}'", collection, db_name);
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Retrieve a collection handle by name.
    ///
    /// With a database name the lookup is direct; without one, every database
    /// on the server is searched except the internal `config` and `local`
    /// ones. Databases that refuse `listCollections` (e.g. for lack of
    /// permissions) are skipped with a debug log.
    pub async fn collection(
        &self,
        collection: &str,
        database: Option<&str>,
    ) -> Result<Option<Collection<Document>>> {
        let mut databases: Vec<Database> = Vec::new();

        match database {
            Some(db_name) => {
                if let Some(db) = self.database(db_name).await? {
                    databases.push(db);
                }
            }
            None => {
                for db_name in self.inner.list_database_names().await? {
                    if !INTERNAL_DATABASES.contains(&db_name.as_str()) {
                        databases.push(self.inner.database(&db_name));
                    }
                }
            }
        }

        for db in &databases {
            match db.list_collection_names().await {
                Ok(names) if names.iter().any(|n| n == collection) => {
                    debug!(
                        "Retrieved collection '{}' from database '{}'",
                        collection,
                        db.name()
                    );
                    return Ok(Some(db.collection::<Document>(collection)));
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(
                        "Unable to list collections in database '{}': {}",
                        db.name(),
                        e
                    );
                }
            }
        }

        warn!(
            "Unable to retrieve collection named '{}' in databases {:?}",
            collection,
            databases.iter().map(|db| db.name()).collect::<Vec<_>>()
        );
        Ok(None)
    }

    /// Retrieve a document by its `_id`.
    ///
    /// Searches all databases for the collection when `database` is `None`.
    #[instrument(skip(self, id))]
    pub async fn entry_by_id(
        &self,
        id: impl Into<EntryId>,
        collection: &str,
        database: Option<&str>,
    ) -> Result<Option<Document>> {
        let Some(coll) = self.collection(collection, database).await? else {
            return Ok(None);
        };

        let id = id.into().into_bson();
        let entry = coll.find_one(doc! { "_id": id.clone() }).await?;
        if entry.is_none() {
            info!(
                "No entry found with _id '{}' in collection '{}'",
                id, collection
            );
        }
        Ok(entry)
    }

    /// Find all documents in a collection matching a filter.
    ///
    /// Returns `Ok(None)` when the collection does not exist, `Ok(Some(vec))`
    /// (possibly empty) otherwise. The filter may be a raw `Document` or a
    /// built [`Query`](crate::Query).
    #[instrument(skip(self, filter))]
    pub async fn match_entries(
        &self,
        database: &str,
        collection: &str,
        filter: impl Into<Document>,
    ) -> Result<Option<Vec<Document>>> {
        let Some(coll) = self.collection(collection, Some(database)).await? else {
            return Ok(None);
        };

        let cursor = coll.find(filter.into()).await?;
        let entries: Vec<Document> = cursor.try_collect().await?;
        Ok(Some(entries))
    }

    /// Insert a document, returning its `_id`.
    ///
    /// The database and collection are created by the server if absent.
    #[instrument(skip(self, data))]
    pub async fn create_entry(
        &self,
        data: Document,
        collection: &str,
        database: &str,
    ) -> Result<Bson> {
        let coll = self.inner.database(database).collection::<Document>(collection);
        let result = coll.insert_one(data).await?;

        info!(
            "Added new entry '{}' to collection '{}'",
            result.inserted_id, collection
        );
        Ok(result.inserted_id)
    }

    /// `$set` the given fields on the document with the matching `_id`.
    ///
    /// Returns `true` iff a document was modified.
    #[instrument(skip(self, id, data))]
    pub async fn update_entry(
        &self,
        id: impl Into<EntryId>,
        data: Document,
        collection: &str,
        database: &str,
    ) -> Result<bool> {
        let coll = self.inner.database(database).collection::<Document>(collection);
        let id = id.into().into_bson();

        let result = coll
            .update_one(doc! { "_id": id.clone() }, doc! { "$set": data })
            .await?;

        if result.modified_count > 0 {
            info!(
                "Updated entry with _id '{}' in collection '{}'",
                id, collection
            );
            Ok(true)
        } else {
            warn!(
                "No update on entry with _id '{}' in collection '{}'",
                id, collection
            );
            Ok(false)
        }
    }

    /// Insert the document, or `$set`-upsert it when it carries an `_id`.
    ///
    /// Returns the new `_id` when a document was inserted or upserted, `None`
    /// when an existing document was updated in place.
    #[instrument(skip(self, data))]
    pub async fn create_or_update_entry(
        &self,
        data: Document,
        collection: &str,
        database: &str,
    ) -> Result<Option<Bson>> {
        match data.get("_id").cloned() {
            None => {
                let id = self.create_entry(data, collection, database).await?;
                Ok(Some(id))
            }
            Some(id) => {
                let coll = self.inner.database(database).collection::<Document>(collection);
                let result = coll
                    .update_one(doc! { "_id": id }, doc! { "$set": data })
                    .upsert(true)
                    .await?;
                Ok(result.upserted_id)
            }
        }
    }

    /// Delete the document with the matching `_id`.
    ///
    /// Returns `true` iff a document was deleted.
    #[instrument(skip(self, id))]
    pub async fn delete_entry_by_id(
        &self,
        id: impl Into<EntryId>,
        collection: &str,
        database: Option<&str>,
    ) -> Result<bool> {
        let Some(coll) = self.collection(collection, database).await? else {
            return Ok(false);
        };

        let id = id.into().into_bson();
        let result = coll.delete_one(doc! { "_id": id.clone() }).await?;

        if result.deleted_count > 0 {
            info!(
                "Deleted entry with _id '{}' from collection '{}'",
                id, collection
            );
            Ok(true)
        } else {
            warn!(
                "No entry found with _id '{}' in collection '{}'",
                id, collection
            );
            Ok(false)
        }
    }

    /// Drop a collection, then verify it is gone.
    #[instrument(skip(self))]
    pub async fn drop_collection(&self, collection: &str, database: Option<&str>) -> Result<bool> {
        let Some(coll) = self.collection(collection, database).await? else {
            return Ok(false);
        };

        coll.drop().await?;

        if self.collection(collection, database).await?.is_some() {
            warn!("Failed to drop collection '{}'", collection);
            Ok(false)
        } else {
            info!("Dropped collection '{}'", collection);
            Ok(true)
        }
    }

    /// All distinct `_id` values in a collection
    pub async fn all_ids(&self, collection: &Collection<Document>) -> Result<Vec<Bson>> {
        let ids = collection.distinct("_id", doc! {}).await?;
        Ok(ids)
    }

    /// The most recently inserted document in a collection, by `_id`
    /// descending.
    ///
    /// Only meaningful for ObjectId `_id`s, which embed the insertion time.
    #[instrument(skip(self))]
    pub async fn most_recent_entry(
        &self,
        collection: &str,
        database: Option<&str>,
    ) -> Result<Option<Document>> {
        let Some(coll) = self.collection(collection, database).await? else {
            return Ok(None);
        };

        let entry = coll.find_one(doc! {}).sort(doc! { "_id": -1 }).await?;
        if entry.is_none() {
            warn!("No entries found in collection '{}'", collection);
        }
        Ok(entry)
    }
}
