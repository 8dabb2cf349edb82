//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Clientbook, built on the Axum web framework.
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register a new account
//! - `POST /api/auth/login` - Login and receive a bearer token
//! - `POST /api/auth/logout` - End the current session
//! - `GET /api/me` - Profile of the caller
//!
//! ## Accounts (`/api/users`)
//! - `GET /api/users`, `POST /api/users`
//! - `GET /api/users/{id}`, `PUT /api/users/{id}`, `DELETE /api/users/{id}`
//!
//! ## Customers (`/api/customers`)
//! - `GET /api/customers`, `POST /api/customers`
//! - `GET /api/customers/{id}`, `PUT /api/customers/{id}`, `DELETE /api/customers/{id}`
//!
//! ## Health
//! - `GET /health`
//!
//! # Authentication
//!
//! Everything except register, login and health requires the token of the
//! account's current session:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`.

/// JSON and query extractors that reject with the API error body.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{
    AccountProfile, CreateCustomerRequest, CustomerResponse, LoginRequest, MessageResponse,
    RegisterRequest, TokenResponse, UpdateCustomerRequest, UpdateUserRequest,
};
use crate::AppState;
use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clientbook API",
        description = "Customer records behind token authentication"
    ),
    paths(
        handlers::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        MessageResponse,
        AccountProfile,
        UpdateUserRequest,
        CreateCustomerRequest,
        UpdateCustomerRequest,
        CustomerResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "users", description = "Account management"),
        (name = "customers", description = "Customer records"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the full application router with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", routes::create_router(state.auth_service.clone()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
