//! Generic HTTP handlers for entity CRUD routes
//!
//! Each handler is generic over the entity and takes its [`CrudService`]
//! as axum state, so the same four functions serve users and notes.

use crate::core::crud::CrudService;
use crate::core::entity::Entity;
use crate::core::error::StackError;
use crate::core::extractors::ApiJson;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value, json};

/// List all records
///
/// GET /get-{plural} → `{ "<plural>": [...] }`
pub async fn list_records<E: Entity>(
    State(service): State<CrudService<E>>,
) -> Result<Json<Value>, StackError> {
    let records = service.list().await?;
    tracing::debug!(entity = E::resource_name(), count = records.len(), "listed records");

    let mut body = Map::new();
    body.insert(E::resource_name().to_string(), json!(records));
    Ok(Json(Value::Object(body)))
}

/// Create a record
///
/// POST /create-{singular} → 201 `{ "message": "New <Label> Created", "id": ... }`
pub async fn create_record<E: Entity>(
    State(service): State<CrudService<E>>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), StackError> {
    let id = service.create_from_json(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("New {} Created", E::label()),
            "id": id,
        })),
    ))
}

/// Apply a partial update
///
/// PATCH /update-{plural}/{id} → `{ "message": "<Label> Updated" }`
///
/// The id is checked before the body, so a malformed id wins over a
/// missing body.
pub async fn update_record<E: Entity>(
    State(service): State<CrudService<E>>,
    Path(id): Path<String>,
    body: Result<ApiJson<Value>, StackError>,
) -> Result<Json<Value>, StackError> {
    service.store().parse_id(&id)?;
    let ApiJson(body) = body?;

    service.update(&id, body).await?;

    Ok(Json(json!({ "message": format!("{} Updated", E::label()) })))
}

/// Delete a record
///
/// DELETE /delete-{singular}/{id} → `{ "message": "<Label> Deleted" }`
pub async fn delete_record<E: Entity>(
    State(service): State<CrudService<E>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StackError> {
    service.delete(&id).await?;

    Ok(Json(json!({ "message": format!("{} Deleted", E::label()) })))
}
