//! Entity traits defining the core abstraction for all record types

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Field values of a single record, keyed by field name.
///
/// Insertion order follows `Entity::fields()` so SQL backends can bind
/// columns in a stable order.
pub type FieldSet = IndexMap<&'static str, String>;

/// Storage-assigned identifier of a record.
///
/// Relational and in-memory backends hand out integers; document stores use
/// their native object ids, carried as hex strings. The JSON form follows
/// the backend: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(id) => Some(*id),
            RecordId::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordId::Int(_) => None,
            RecordId::Text(id) => Some(id),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

/// Request body accepted by the create and update endpoints of an entity.
///
/// Every field is optional at the type level: create requires all of them,
/// update applies whichever are present.
pub trait Payload: Validate + DeserializeOwned + Default + Send + Sync + 'static {
    /// The fields present in this payload, in declaration order
    fn to_fields(&self) -> FieldSet;
}

/// Base trait for all record types exposed by the server.
///
/// Every entity is a flat record: a storage-assigned `id` plus a fixed list
/// of string fields, some of which must be unique within the collection.
/// Implementations are normally generated by `impl_crud_entity!`.
pub trait Entity: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Body type for create/update requests
    type Payload: Payload;

    /// The plural resource name, also the table or collection name (e.g., "users")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "user")
    fn resource_name_singular() -> &'static str;

    /// Human readable label used in messages (e.g., "User")
    fn label() -> &'static str;

    /// All fields besides `id`, in declaration order
    fn fields() -> &'static [&'static str];

    /// Fields whose values must not repeat across records
    fn unique_fields() -> &'static [&'static str];

    /// Get the identifier of this record
    fn id(&self) -> &RecordId;

    /// Get a field value by name
    fn field_value(&self, field: &str) -> Option<&str>;

    /// Rebuild a record from its id and stored field values.
    ///
    /// Returns `None` when a declared field is absent.
    fn from_fields(id: RecordId, fields: &FieldSet) -> Option<Self>;

    /// Check whether `field` is a declared field of this entity
    fn has_field(field: &str) -> bool {
        Self::fields().contains(&field)
    }

    /// Check whether `field` carries a uniqueness constraint
    fn is_unique(field: &str) -> bool {
        Self::unique_fields().contains(&field)
    }
}
