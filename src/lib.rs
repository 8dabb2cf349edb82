//! # Clientbook
//!
//! A CRUD backend for customer records with a self-contained authentication
//! subsystem: password hashing, signed session tokens and a single active
//! session per account.
//!
//! ## Overview
//!
//! Clientbook can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `clientbook-server` binary
//! 2. **As a library** - Build the router or the auth core into your own service
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use clientbook::auth::{password::Argon2Hasher, jwt::TokenService, service::AuthService};
//! use clientbook::db::DatabaseProvider;
//! use std::sync::Arc;
//!
//! let db = DatabaseProvider::Memory.create_client().await?;
//! let tokens = TokenService::new("a-long-random-secret", chrono::Duration::hours(24))?;
//! let auth = AuthService::new(db, Arc::new(Argon2Hasher::new()), tokens)?;
//!
//! auth.register("ada@example.com", "Password1", Some("Ada")).await?;
//! let session = auth.login("ada@example.com", "Password1").await?;
//! let claims = auth.authenticate(&session.token).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, tokens, sessions and the request gate
//! - [`db`] - Storage abstraction (SQLite, Turso)
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - TOML configuration and pagination

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication core and middleware.
pub mod auth;
/// Command-line interface for the server binary.
pub mod cli;
/// Database clients (Turso/SQLite).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and pagination utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::service::AuthService;
pub use db::{DatabaseClient, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::AppConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration, resolved once at startup
    pub config: Arc<AppConfig>,
    /// Database client
    pub db: Arc<dyn DatabaseClient>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
}
