//! Routes that do not belong to an entity: welcome and health checks

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

const WELCOME: &str = "Congrats! You have successfully set up your full-stack project! \
If you're reading this message, it means your frontend and backend are completely connected! \
You are ready to create your next big project!";

/// Build the welcome and health routes
///
/// - GET / and GET /autostack - welcome payload naming the storage backend
/// - GET /health and GET /healthz - liveness check
pub fn build_root_routes(database: &'static str) -> Router {
    let welcome_routes = Router::new()
        .route("/", get(welcome))
        .route("/autostack", get(welcome))
        .with_state(database);

    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .merge(welcome_routes)
}

async fn welcome(State(database): State<&'static str>) -> Json<Value> {
    Json(json!({
        "message": WELCOME,
        "backend": "axum",
        "database": database,
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "autostack"
    }))
}
