//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - CRUD routes for users and notes
//! - welcome and health routes

pub mod builder;
pub mod entity_registry;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{CrudDescriptor, EntityDescriptor, EntityRegistry};
