//! In-memory implementation of DataService for testing and development

use crate::config::Backend;
use crate::core::entity::{Entity, FieldSet, RecordId};
use crate::core::error::{EntityError, Result, StackError, StorageError};
use crate::core::service::{DataService, parse_integer_id};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory data service implementation
///
/// Behaves like a relational table: integer ids handed out from a counter,
/// unique fields enforced on write. Rows keep insertion order. Uses RwLock
/// for thread-safe access.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    rows: Arc<RwLock<IndexMap<i64, FieldSet>>>,
    next_id: Arc<AtomicI64>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new, empty in-memory service
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(IndexMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl ToString) -> StackError {
    StorageError::query("In-Memory", format!("lock poisoned: {}", err.to_string())).into()
}

impl<T: Entity> InMemoryDataService<T> {
    fn to_entity(id: i64, fields: &FieldSet) -> Result<T> {
        T::from_fields(RecordId::Int(id), fields).ok_or_else(|| {
            StorageError::MalformedRecord {
                backend: "In-Memory".to_string(),
                entity_type: T::label().to_string(),
                message: format!("row {} is missing fields", id),
            }
            .into()
        })
    }

    /// Reject `candidate` when a unique value is held by a row other than `own_id`
    fn check_unique(
        rows: &IndexMap<i64, FieldSet>,
        candidate: &FieldSet,
        own_id: Option<i64>,
    ) -> Result<()> {
        let clash = rows
            .iter()
            .filter(|(id, _)| Some(**id) != own_id)
            .any(|(_, row)| {
                T::unique_fields()
                    .iter()
                    .any(|field| candidate.get(field).is_some_and(|v| row.get(field) == Some(v)))
            });

        if clash {
            return Err(EntityError::already_exists(T::label(), T::unique_fields()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    fn backend(&self) -> Backend {
        Backend::InMemory
    }

    fn parse_id(&self, raw: &str) -> Result<RecordId> {
        parse_integer_id::<T>(raw)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let rows = self.rows.read().map_err(lock_error)?;

        rows.iter()
            .map(|(id, fields)| Self::to_entity(*id, fields))
            .collect()
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>> {
        let Some(id) = id.as_int() else {
            return Ok(None);
        };
        let rows = self.rows.read().map_err(lock_error)?;

        rows.get(&id)
            .map(|fields| Self::to_entity(id, fields))
            .transpose()
    }

    async fn create(&self, values: FieldSet) -> Result<RecordId> {
        let mut rows = self.rows.write().map_err(lock_error)?;

        Self::check_unique(&rows, &values, None)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        rows.insert(id, values);

        Ok(RecordId::Int(id))
    }

    async fn update(&self, id: &RecordId, values: FieldSet) -> Result<bool> {
        let Some(id) = id.as_int() else {
            return Ok(false);
        };
        let mut rows = self.rows.write().map_err(lock_error)?;

        if !rows.contains_key(&id) {
            return Ok(false);
        }
        Self::check_unique(&rows, &values, Some(id))?;

        if let Some(row) = rows.get_mut(&id) {
            row.extend(values);
        }
        Ok(true)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool> {
        let Some(id) = id.as_int() else {
            return Ok(false);
        };
        let mut rows = self.rows.write().map_err(lock_error)?;

        Ok(rows.shift_remove(&id).is_some())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        if !T::has_field(field) {
            return Ok(Vec::new());
        }
        let rows = self.rows.read().map_err(lock_error)?;

        rows.iter()
            .filter(|(_, fields)| fields.get(field).is_some_and(|v| v == value))
            .map(|(id, fields)| Self::to_entity(*id, fields))
            .collect()
    }
}
