//! Authentication core
//!
//! Credential hashing, session tokens, the per-account session store and the
//! flows that tie them together.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id credential hashing
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and validation
//! - [`auth::session`](crate::auth::session) - Active-token store (one per account)
//! - [`auth::service`](crate::auth::service) - Register, login, logout and the gate
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractors
//! - [`auth::validation`](crate::auth::validation) - Email and password policy
//!
//! # Session Model
//!
//! Each account holds at most one active token. Logging in overwrites it, which
//! silently ends any earlier session; logging out clears it. A request passes the
//! gate only when its token verifies **and** is still the one on record, so a
//! superseded or logged-out token is rejected even before it expires.
//!
//! # Usage
//!
//! ```ignore
//! use clientbook::auth::{jwt::TokenService, password::Argon2Hasher, service::AuthService};
//!
//! let tokens = TokenService::new(&secret, chrono::Duration::hours(24))?;
//! let auth = AuthService::new(db, Arc::new(Argon2Hasher::new()), tokens)?;
//!
//! let session = auth.login("a@b.com", "StrongPass1").await?;
//! let claims = auth.authenticate(&session.token).await?;
//! ```
//!
//! # Configuration
//!
//! Configure via `clientbook.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"  # Env var holding the signing secret
//! jwt_expiry_hours = 24          # Token validity duration
//! ```

/// Token issuance and validation.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Credential hashing.
pub mod password;
/// Registration, login, logout and the gate.
pub mod service;
/// Active-token bookkeeping.
pub mod session;
/// Credential validation rules.
pub mod validation;
