//! Relational storage for accounts and customers.
//!
//! - [`traits`] defines the `DatabaseClient` boundary every backend implements
//! - [`turso`] is the libsql backend (in-memory, local file, or remote Turso)
//!
//! Enable the remote backend via Cargo features:
//! ```toml
//! clientbook = { version = "*", features = ["turso"] }
//! ```

pub mod traits;
pub mod turso;

pub use traits::{
    Customer, CustomerUpdate, DatabaseClient, DatabaseProvider, NewCustomer, User, UserUpdate,
};
pub use turso::TursoClient;
