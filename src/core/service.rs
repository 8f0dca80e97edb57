//! Service trait for record storage

use crate::config::Backend;
use crate::core::entity::{Entity, FieldSet, RecordId};
use crate::core::error::{EntityError, Result};
use async_trait::async_trait;

/// Service trait for storing records of one entity type
///
/// Implementations translate each call into a single driver or SQL call.
/// The CRUD contract (required fields, uniqueness, not-found mapping) lives
/// in [`CrudService`](crate::core::crud::CrudService), so backends stay thin.
#[async_trait]
pub trait DataService<E: Entity>: Send + Sync {
    /// The backend behind this service
    fn backend(&self) -> Backend;

    /// Parse a raw path segment into an identifier for this backend
    ///
    /// Document stores reject malformed ids with a validation error;
    /// relational stores report them as not found.
    fn parse_id(&self, raw: &str) -> Result<RecordId>;

    /// List all records
    async fn list(&self) -> Result<Vec<E>>;

    /// Get a record by ID
    async fn get(&self, id: &RecordId) -> Result<Option<E>>;

    /// Insert a new record and return its assigned ID
    async fn create(&self, values: FieldSet) -> Result<RecordId>;

    /// Apply the given field values to an existing record
    ///
    /// Returns `false` when no record matched `id`.
    async fn update(&self, id: &RecordId, values: FieldSet) -> Result<bool>;

    /// Delete a record
    ///
    /// Returns `false` when no record matched `id`.
    async fn delete(&self, id: &RecordId) -> Result<bool>;

    /// Find records whose `field` equals `value` exactly
    ///
    /// Unknown fields yield an empty result.
    async fn search(&self, field: &str, value: &str) -> Result<Vec<E>>;
}

/// Parse an integer identifier for relational-style backends.
///
/// Anything that is not an integer cannot resolve to a row, so it is
/// reported as not found rather than rejected.
pub fn parse_integer_id<E: Entity>(raw: &str) -> Result<RecordId> {
    raw.trim()
        .parse::<i64>()
        .map(RecordId::Int)
        .map_err(|_| EntityError::not_found(E::label(), raw).into())
}
