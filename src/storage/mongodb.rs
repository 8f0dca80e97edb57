//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` backed by a MongoDB database via
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! autostack-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One collection per entity type, named by `T::resource_name()` ("users",
//! "notes"). Each document holds `_id` (a driver-generated `ObjectId`) plus
//! one string per field. Records expose the id as its 24-character hex
//! form.
//!
//! # Identifier policy
//!
//! As a document store, this backend rejects syntactically invalid ids
//! (`ValidationError::InvalidId`, HTTP 400) before touching the database.

use crate::config::Backend;
use crate::core::entity::{Entity, FieldSet, RecordId};
use crate::core::error::{EntityError, Result, StackError, StorageError, ValidationError};
use crate::core::service::DataService;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

const BACKEND: &str = "MongoDB";

/// Server error code for duplicate keys on a unique index
const DUPLICATE_KEY: i32 = 11000;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert field values into a BSON document (without `_id`)
fn fields_to_document(values: FieldSet) -> Document {
    let mut doc = Document::new();
    for (field, value) in values {
        doc.insert(field, value);
    }
    doc
}

/// Parse a hex string into an ObjectId, reporting failures as invalid ids
fn object_id<T: Entity>(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| ValidationError::invalid_id(T::resource_name_singular(), raw).into())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use autostack::storage::MongoDataService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let service = MongoDataService::<User>::new(client.database("example_db"));
/// service.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Entity> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    /// Create a unique index for every unique field (idempotent).
    ///
    /// Safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        for field in T::unique_fields() {
            let index = IndexModel::builder()
                .keys(doc! { *field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.collection()
                .create_index(index)
                .await
                .map_err(|e| StorageError::SchemaError {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "failed to index {}.{}: {}",
                        T::resource_name(),
                        field,
                        e
                    ),
                })?;
        }
        tracing::debug!(collection = T::resource_name(), "unique indexes ensured");
        Ok(())
    }

    /// Convert a MongoDB document back into a record.
    fn document_to_entity(doc: Document) -> Result<T> {
        let malformed = |message: String| -> StackError {
            StorageError::MalformedRecord {
                backend: BACKEND.to_string(),
                entity_type: T::label().to_string(),
                message,
            }
            .into()
        };

        let id = doc
            .get_object_id("_id")
            .map_err(|e| malformed(format!("bad _id: {}", e)))?;

        let mut fields = FieldSet::new();
        for field in T::fields() {
            if let Ok(value) = doc.get_str(field) {
                fields.insert(*field, value.to_string());
            }
        }

        T::from_fields(RecordId::Text(id.to_hex()), &fields)
            .ok_or_else(|| malformed(format!("document {} is missing fields", id.to_hex())))
    }

    /// Map a driver error, turning duplicate key failures into conflicts.
    fn map_error(err: mongodb::error::Error, action: &str) -> StackError {
        if is_duplicate_key(&err) {
            tracing::warn!(collection = T::resource_name(), "duplicate key rejected");
            return EntityError::already_exists(T::label(), T::unique_fields()).into();
        }
        tracing::warn!(collection = T::resource_name(), error = %err, "{} failed", action);
        StorageError::query(BACKEND, format!("failed to {}: {}", action, err)).into()
    }

    async fn find(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| Self::map_error(e, "query documents"))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| Self::map_error(e, "collect documents"))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for MongoDataService<T> {
    fn backend(&self) -> Backend {
        Backend::MongoDb
    }

    fn parse_id(&self, raw: &str) -> Result<RecordId> {
        object_id::<T>(raw).map(|oid| RecordId::Text(oid.to_hex()))
    }

    async fn list(&self) -> Result<Vec<T>> {
        tracing::debug!(collection = T::resource_name(), "list");
        self.find(doc! {}).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>> {
        let Some(raw) = id.as_text() else {
            return Ok(None);
        };
        let oid = object_id::<T>(raw)?;

        let doc = self
            .collection()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| Self::map_error(e, "get document"))?;

        doc.map(Self::document_to_entity).transpose()
    }

    async fn create(&self, values: FieldSet) -> Result<RecordId> {
        let result = self
            .collection()
            .insert_one(fields_to_document(values))
            .await
            .map_err(|e| Self::map_error(e, "insert document"))?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(RecordId::Text(oid.to_hex())),
            other => Ok(RecordId::Text(other.to_string())),
        }
    }

    async fn update(&self, id: &RecordId, values: FieldSet) -> Result<bool> {
        let Some(raw) = id.as_text() else {
            return Ok(false);
        };
        let oid = object_id::<T>(raw)?;

        let result = self
            .collection()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": fields_to_document(values) },
            )
            .await
            .map_err(|e| Self::map_error(e, "update document"))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool> {
        let Some(raw) = id.as_text() else {
            return Ok(false);
        };
        let oid = object_id::<T>(raw)?;

        let result = self
            .collection()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| Self::map_error(e, "delete document"))?;

        Ok(result.deleted_count > 0)
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        if !T::has_field(field) {
            return Ok(Vec::new());
        }
        self.find(doc! { field: value }).await
    }
}
