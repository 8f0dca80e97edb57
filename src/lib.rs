//! # autostack
//!
//! A starter CRUD backend serving two flat record types, users and notes,
//! over one axum router and interchangeable storage backends.
//!
//! ## Features
//!
//! - **Uniform endpoints**: the same eight CRUD routes on every backend
//! - **Pluggable storage**: in-memory (default), MongoDB, PostgreSQL, MySQL,
//!   each behind a cargo feature
//! - **Typed errors**: every failure maps to a status code and a JSON body
//! - **Macro-declared entities**: fields, uniqueness and validation in one place
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autostack::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_user_service(InMemoryDataService::<User>::new())
//!         .with_note_service(InMemoryDataService::<Note>::new())
//!         .serve("0.0.0.0:5000")
//!         .await
//! }
//! ```
//!
//! Routes served:
//!
//! | Method | Path |
//! |---|---|
//! | GET | `/get-users`, `/get-notes` |
//! | POST | `/create-user`, `/create-note` |
//! | PATCH | `/update-users/{id}`, `/update-notes/{id}` |
//! | DELETE | `/delete-user/{id}`, `/delete-note/{id}` |
//! | GET | `/`, `/autostack`, `/health`, `/healthz` |

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiJson, ConfigError, CrudService, DataService, Entity, EntityError, FieldSet, Payload,
        RecordId, StackError, StorageError, ValidationError,
    };

    // === Entities ===
    pub use crate::entities::{Note, NotePayload, User, UserPayload};
    pub use crate::impl_crud_entity;

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;
    #[cfg(feature = "mysql")]
    pub use crate::storage::MysqlDataService;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresDataService;

    // === Config ===
    pub use crate::config::{AppConfig, Backend, DatabaseConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{CrudDescriptor, EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, patch, post},
    };
}
