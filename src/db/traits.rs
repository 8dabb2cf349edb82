//! Database abstraction traits
//!
//! This module provides the `DatabaseClient` trait that abstracts over different
//! database backends (in-memory SQLite, file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use clientbook::db::{DatabaseClient, DatabaseProvider};
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data.db".into() }.create_client().await?;
//! ```

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn DatabaseClient>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Arc::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                let client =
                    super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await?;
                Ok(Arc::new(client))
            }
        }
    }

    /// Pick a provider from a configured database URL
    pub fn from_url(url: &str) -> Self {
        match url.trim() {
            "" | ":memory:" | "memory" => DatabaseProvider::Memory,
            path => DatabaseProvider::SQLite {
                path: path.to_string(),
            },
        }
    }
}

/// Account record from the database
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields to change on an account; `None` leaves a column untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Customer record from the database
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// New customer to insert
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
}

/// Fields to change on a customer; `None` leaves a column untouched
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Abstract trait for database operations
///
/// Soft-deleted rows are invisible to every read. Unique violations surface
/// as `AppError::ConstraintViolation`, missing rows on writes as
/// `AppError::NotFound`.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    // ============== User Operations ==============

    /// Create a new user with no active token
    async fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<()>;

    /// Get a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Apply a partial update and return the updated user
    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User>;

    /// Soft-delete a user and drop its active token
    async fn delete_user(&self, id: &str) -> Result<()>;

    /// Page through users, returning the page and the total count
    async fn list_users(&self, limit: u32, offset: u32) -> Result<(Vec<User>, i64)>;

    // ============== Session Operations ==============

    /// Overwrite (or clear, with `None`) the stored active-token digest
    async fn set_active_token(&self, user_id: &str, token_hash: Option<&str>) -> Result<()>;

    /// Stored active-token digest, `None` if logged out or no such user
    async fn get_active_token(&self, user_id: &str) -> Result<Option<String>>;

    // ============== Customer Operations ==============

    /// Insert a customer and return the stored record
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer>;

    /// Get a customer by ID
    async fn get_customer(&self, id: &str) -> Result<Option<Customer>>;

    /// Apply a partial update and return the updated customer
    async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer>;

    /// Soft-delete a customer
    async fn delete_customer(&self, id: &str) -> Result<()>;

    /// Page through customers, returning the page and the total count
    async fn list_customers(&self, limit: u32, offset: u32) -> Result<(Vec<Customer>, i64)>;
}
