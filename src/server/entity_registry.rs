//! Entity registry for managing entity descriptors and generating CRUD routes

use crate::core::crud::CrudService;
use crate::core::entity::Entity;
use crate::server::handlers::{create_record, delete_record, list_records, update_record};
use axum::Router;
use axum::routing::{delete, get, patch, post};
use std::collections::HashMap;

/// Trait that describes how to build routes for an entity
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "user")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "users")
    fn plural(&self) -> &str;

    /// Build the CRUD routes for this entity
    ///
    /// Should return a Router with routes like:
    /// - GET /get-{plural}
    /// - POST /create-{singular}
    /// - PATCH /update-{plural}/{id}
    /// - DELETE /delete-{singular}/{id}
    fn build_routes(&self) -> Router;
}

/// Descriptor serving one entity through its [`CrudService`]
pub struct CrudDescriptor<E: Entity> {
    service: CrudService<E>,
}

impl<E: Entity> CrudDescriptor<E> {
    pub fn new(service: CrudService<E>) -> Self {
        Self { service }
    }
}

impl<E: Entity> EntityDescriptor for CrudDescriptor<E> {
    fn entity_type(&self) -> &str {
        E::resource_name_singular()
    }

    fn plural(&self) -> &str {
        E::resource_name()
    }

    fn build_routes(&self) -> Router {
        let singular = E::resource_name_singular();
        let plural = E::resource_name();

        Router::new()
            .route(&format!("/get-{}", plural), get(list_records::<E>))
            .route(&format!("/create-{}", singular), post(create_record::<E>))
            .route(
                &format!("/update-{}/{{id}}", plural),
                patch(update_record::<E>),
            )
            .route(
                &format!("/delete-{}/{{id}}", singular),
                delete(delete_record::<E>),
            )
            .with_state(self.service.clone())
    }
}

/// Registry for all entities served by the application
///
/// Collects entity descriptors and merges their routes into one router.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The entity type name will be used as the key.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            tracing::debug!(
                entity = descriptor.entity_type(),
                collection = descriptor.plural(),
                "mounting CRUD routes"
            );
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
