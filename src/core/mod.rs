//! Core module containing fundamental traits and types

pub mod crud;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod service;

pub use crud::CrudService;
pub use entity::{Entity, FieldSet, Payload, RecordId};
pub use error::{
    ConfigError, EntityError, Result, StackError, StorageError, ValidationError,
};
pub use extractors::ApiJson;
pub use service::DataService;
