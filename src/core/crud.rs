//! CRUD contract shared by every entity and backend
//!
//! `CrudService<E>` sits between the HTTP handlers and a [`DataService<E>`].
//! It owns the rules that the handlers expose:
//!
//! - create: every field present and non-empty, format checks pass, no
//!   unique value already taken
//! - update: valid id, a non-empty body with at least one known field,
//!   the record exists, no unique value taken by another record
//! - delete: valid id, the record exists

use crate::core::entity::{Entity, FieldSet, Payload, RecordId};
use crate::core::error::{EntityError, Result, StackError, ValidationError};
use crate::core::service::DataService;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// Entity handler applying the CRUD contract on top of a storage service
pub struct CrudService<E: Entity> {
    store: Arc<dyn DataService<E>>,
}

impl<E: Entity> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<E: Entity> CrudService<E> {
    pub fn new(store: Arc<dyn DataService<E>>) -> Self {
        Self { store }
    }

    /// Get the underlying storage service
    pub fn store(&self) -> &Arc<dyn DataService<E>> {
        &self.store
    }

    /// List all records
    pub async fn list(&self) -> Result<Vec<E>> {
        self.store.list().await
    }

    /// Create a record from a raw JSON body
    ///
    /// The body must be a JSON object; arrays and scalars are rejected even
    /// when they would deserialize positionally.
    pub async fn create_from_json(&self, body: Value) -> Result<RecordId> {
        let object = match body {
            Value::Object(map) => map,
            _ => {
                return Err(ValidationError::InvalidJson {
                    message: "expected a JSON object".to_string(),
                }
                .into());
            }
        };
        let payload: E::Payload = serde_json::from_value(Value::Object(object))?;
        self.create(payload).await
    }

    /// Validate a payload and persist it as a new record
    pub async fn create(&self, payload: E::Payload) -> Result<RecordId> {
        let values = payload.to_fields();

        let missing: Vec<String> = E::fields()
            .iter()
            .filter(|field| values.get(*field).is_none_or(|v| v.trim().is_empty()))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing }.into());
        }

        payload.validate()?;
        self.ensure_unique(&values, None).await?;

        let id = self.store.create(values).await?;
        tracing::info!(entity = E::resource_name_singular(), %id, "record created");
        Ok(id)
    }

    /// Apply a partial update from a raw JSON body
    pub async fn update(&self, raw_id: &str, body: Value) -> Result<()> {
        let id = self.store.parse_id(raw_id)?;

        let object = match body {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(ValidationError::NoData.into()),
        };
        let payload: E::Payload = serde_json::from_value(Value::Object(object))?;

        let values = payload.to_fields();
        if values.is_empty() {
            return Err(ValidationError::NoValidFields.into());
        }

        // Required fields may be changed but never blanked
        let blank: Vec<String> = values
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field.to_string())
            .collect();
        if !blank.is_empty() {
            return Err(ValidationError::MissingFields { fields: blank }.into());
        }
        payload.validate()?;

        if self.store.get(&id).await?.is_none() {
            return Err(EntityError::not_found(E::label(), &id).into());
        }
        self.ensure_unique(&values, Some(&id)).await?;

        if !self.store.update(&id, values).await? {
            return Err(EntityError::not_found(E::label(), &id).into());
        }
        tracing::info!(entity = E::resource_name_singular(), %id, "record updated");
        Ok(())
    }

    /// Delete a record
    pub async fn delete(&self, raw_id: &str) -> Result<()> {
        let id = self.store.parse_id(raw_id)?;

        if !self.store.delete(&id).await? {
            return Err(EntityError::not_found(E::label(), &id).into());
        }
        tracing::info!(entity = E::resource_name_singular(), %id, "record deleted");
        Ok(())
    }

    /// Fail with a conflict when any unique value in `values` belongs to a
    /// record other than `exclude`
    async fn ensure_unique(&self, values: &FieldSet, exclude: Option<&RecordId>) -> Result<()> {
        for (field, value) in values.iter().filter(|(field, _)| E::is_unique(field)) {
            let taken = self
                .store
                .search(field, value)
                .await?
                .into_iter()
                .any(|existing| Some(existing.id()) != exclude);

            if taken {
                tracing::warn!(
                    entity = E::resource_name_singular(),
                    field = *field,
                    "uniqueness conflict"
                );
                return Err(StackError::from(EntityError::already_exists(
                    E::label(),
                    E::unique_fields(),
                )));
            }
        }
        Ok(())
    }
}
