//! Typed error handling for autostack
//!
//! Handlers and storage backends return [`StackError`], which knows its HTTP
//! status and renders itself as a JSON error body.
//!
//! # Error Categories
//!
//! - [`EntityError`]: record lookups and uniqueness conflicts
//! - [`ValidationError`]: malformed or missing request input
//! - [`StorageError`]: failures reported by a storage backend
//! - [`ConfigError`]: invalid or missing configuration
//!
//! # Status mapping
//!
//! | Error | Status |
//! |---|---|
//! | `EntityError::NotFound` | 404 |
//! | `EntityError::AlreadyExists` | 400 |
//! | `ValidationError::*` | 400 |
//! | `StorageError::*` | 400, with the backend's message |
//! | `ConfigError::*` | 500 |
//!
//! # Example
//!
//! ```rust,ignore
//! match service.delete("99999").await {
//!     Ok(()) => {}
//!     Err(StackError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("nothing stored under {}", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, StackError>;

/// The main error type for autostack
#[derive(Debug, Error)]
pub enum StackError {
    /// Entity-related errors (lookups, conflicts)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl StackError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StackError::Entity(e) => e.status_code(),
            StackError::Validation(_) => StatusCode::BAD_REQUEST,
            // Storage failures surface to the client as a plain bad request
            StackError::Storage(_) => StatusCode::BAD_REQUEST,
            StackError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StackError::Entity(e) => e.error_code(),
            StackError::Validation(e) => e.error_code(),
            StackError::Storage(_) => "STORAGE_ERROR",
            StackError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            StackError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            StackError::Entity(EntityError::AlreadyExists { fields, .. }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            StackError::Validation(ValidationError::MissingFields { fields }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            StackError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for StackError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// No record matched the identifier
    #[error("{entity_type} not found")]
    NotFound { entity_type: String, id: String },

    /// A unique field value is already taken
    #[error("{entity_type} with same {} already exists", .fields.join(" or "))]
    AlreadyExists {
        entity_type: String,
        fields: Vec<String>,
    },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity_type: &str, fields: &[&str]) -> Self {
        EntityError::AlreadyExists {
            entity_type: entity_type.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Required fields are absent or empty
    #[error("Missing fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// One or more fields failed format validation
    #[error("Validation failed: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// The request carried no body, or an empty one
    #[error("No data provided")]
    NoData,

    /// The body did not contain any recognized field
    #[error("No valid fields to update")]
    NoValidFields,

    /// The identifier is not syntactically valid for the backend
    #[error("Invalid {entity_type} id")]
    InvalidId { entity_type: String, id: String },

    /// The body is not valid JSON for the expected shape
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn invalid_id(entity_type: &str, id: &str) -> Self {
        ValidationError::InvalidId {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields { .. } => "MISSING_FIELDS",
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::NoData => "NO_DATA",
            ValidationError::NoValidFields => "NO_VALID_FIELDS",
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid {}", e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for StackError {
    fn from(errors: validator::ValidationErrors) -> Self {
        StackError::Validation(errors.into())
    }
}

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach the database
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// A query or command failed
    #[error("{backend} query failed: {message}")]
    QueryError { backend: String, message: String },

    /// Creating tables or indexes failed
    #[error("{backend} schema setup failed: {message}")]
    SchemaError { backend: String, message: String },

    /// A stored record could not be mapped back to its entity
    #[error("{backend} returned a malformed {entity_type} record: {message}")]
    MalformedRecord {
        backend: String,
        entity_type: String,
        message: String,
    },
}

impl StorageError {
    pub fn query(backend: &str, err: impl ToString) -> Self {
        StorageError::QueryError {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a configuration file
    #[error("Failed to parse config file '{file}': {message}")]
    ParseError { file: String, message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// A variable holds a value that cannot be used
    #[error("Invalid value '{value}' for {field}: {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}
