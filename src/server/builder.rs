//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{CrudDescriptor, EntityRegistry};
use super::router::build_root_routes;
use crate::core::crud::CrudService;
use crate::core::service::DataService;
use crate::entities::{Note, User};
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the autostack HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_user_service(InMemoryDataService::<User>::new())
///     .with_note_service(InMemoryDataService::<Note>::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    users: Option<CrudService<User>>,
    notes: Option<CrudService<Note>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            users: None,
            notes: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the storage service for users (required)
    pub fn with_user_service(mut self, service: impl DataService<User> + 'static) -> Self {
        self.users = Some(CrudService::new(Arc::new(service)));
        self
    }

    /// Set the storage service for notes (required)
    pub fn with_note_service(mut self, service: impl DataService<Note> + 'static) -> Self {
        self.notes = Some(CrudService::new(Arc::new(service)));
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{Router, routing::get};
    ///
    /// let extra = Router::new().route("/version", get(|| async { env!("CARGO_PKG_VERSION") }));
    ///
    /// ServerBuilder::new()
    ///     .with_user_service(users)
    ///     .with_note_service(notes)
    ///     .with_custom_routes(extra)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// This generates:
    /// - welcome and health routes
    /// - CRUD routes for users and notes
    /// - any custom routes
    ///
    /// wrapped in request tracing and a permissive CORS layer.
    pub fn build(self) -> Result<Router> {
        let users = self
            .users
            .ok_or_else(|| anyhow!("User service is required. Call .with_user_service()"))?;
        let notes = self
            .notes
            .ok_or_else(|| anyhow!("Note service is required. Call .with_note_service()"))?;

        let database = users.store().backend().display_name();

        let mut registry = EntityRegistry::new();
        registry.register(Box::new(CrudDescriptor::new(users)));
        registry.register(Box::new(CrudDescriptor::new(notes)));
        tracing::info!(entities = ?registry.entity_types(), database, "building router");

        let mut app = build_root_routes(database).merge(registry.build_routes());
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_user_service(users)
    ///     .with_note_service(notes)
    ///     .serve("0.0.0.0:5000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
