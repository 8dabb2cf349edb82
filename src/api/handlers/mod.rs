//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login, logout, me).
pub mod auth;
/// Customer record CRUD handlers.
pub mod customers;
/// Account management handlers.
pub mod users;

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
