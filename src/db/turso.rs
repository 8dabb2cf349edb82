use super::traits::{Customer, CustomerUpdate, DatabaseClient, NewCustomer, User, UserUpdate};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";
const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

/// libsql-backed storage for accounts and customers.
///
/// Holds a single connection so that an in-memory database is shared by every
/// caller instead of each connection getting its own empty copy.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Ephemeral in-memory database, mostly for tests and local runs
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// File-backed SQLite database
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Remote Turso database
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table; `token_hash` is the digest of the single active token
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL DEFAULT 'user',
                token_hash TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Customers table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS customers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                phone TEXT NOT NULL,
                address TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create customers table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_customers_phone ON customers(phone)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create customer index: {}", e)))?;

        Ok(())
    }

    async fn fetch_user(&self, filter: &str, value: &str) -> Result<Option<User>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {} FROM users WHERE {} = ? AND deleted_at IS NULL",
            USER_COLUMNS, filter
        );

        let mut rows = conn
            .query(&sql, [value])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DatabaseClient for TursoClient {
    async fn create_user(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (id, email, password_hash, name, role, now, now),
        )
        .await
        .map_err(|e| write_error("create user", e))?;

        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_user("email", email).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.fetch_user("id", id).await
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();
        let password_hash = update.password_hash.as_deref();

        // A new password also ends the current session
        let affected = conn
            .execute(
                "UPDATE users SET
                    email = COALESCE(?, email),
                    name = COALESCE(?, name),
                    password_hash = COALESCE(?, password_hash),
                    token_hash = CASE WHEN ? IS NULL THEN token_hash ELSE NULL END,
                    updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
                (
                    update.email.as_deref(),
                    update.name.as_deref(),
                    password_hash,
                    password_hash,
                    now,
                    id,
                ),
            )
            .await
            .map_err(|e| write_error("update user", e))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        self.get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE users SET deleted_at = ?, token_hash = NULL, updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
                (now, now, id),
            )
            .await
            .map_err(|e| write_error("delete user", e))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }

    async fn list_users(&self, limit: u32, offset: u32) -> Result<(Vec<User>, i64)> {
        let conn = self.connection()?;
        let total = count_rows(&conn, "users").await?;

        let sql = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL
             ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let mut rows = conn
            .query(&sql, (limit as i64, offset as i64))
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(user_from_row(&row)?);
        }

        Ok((users, total))
    }

    async fn set_active_token(&self, user_id: &str, token_hash: Option<&str>) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        // Single-row overwrite: concurrent logins resolve to the last writer
        let affected = conn
            .execute(
                "UPDATE users SET token_hash = ?, updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
                (token_hash, now, user_id),
            )
            .await
            .map_err(|e| write_error("store session token", e))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        Ok(())
    }

    async fn get_active_token(&self, user_id: &str) -> Result<Option<String>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT token_hash FROM users WHERE id = ? AND deleted_at IS NULL",
                [user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query session token: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row
                .get::<Option<String>>(0)
                .map_err(|e| AppError::Database(e.to_string())),
            None => Ok(None),
        }
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO customers (id, name, email, phone, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                customer.id.as_str(),
                customer.name.as_str(),
                customer.email.as_deref(),
                customer.phone.as_str(),
                customer.address.as_deref(),
                now,
                now,
            ),
        )
        .await
        .map_err(|e| write_error("create customer", e))?;

        Ok(Customer {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {} FROM customers WHERE id = ? AND deleted_at IS NULL",
            CUSTOMER_COLUMNS
        );

        let mut rows = conn
            .query(&sql, [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query customer: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE customers SET
                    name = COALESCE(?, name),
                    email = COALESCE(?, email),
                    phone = COALESCE(?, phone),
                    address = COALESCE(?, address),
                    updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
                (
                    update.name.as_deref(),
                    update.email.as_deref(),
                    update.phone.as_deref(),
                    update.address.as_deref(),
                    now,
                    id,
                ),
            )
            .await
            .map_err(|e| write_error("update customer", e))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("Customer {} not found", id)));
        }

        self.get_customer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    async fn delete_customer(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE customers SET deleted_at = ?, updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
                (now, now, id),
            )
            .await
            .map_err(|e| write_error("delete customer", e))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("Customer {} not found", id)));
        }

        Ok(())
    }

    async fn list_customers(&self, limit: u32, offset: u32) -> Result<(Vec<Customer>, i64)> {
        let conn = self.connection()?;
        let total = count_rows(&conn, "customers").await?;

        let sql = format!(
            "SELECT {} FROM customers WHERE deleted_at IS NULL
             ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            CUSTOMER_COLUMNS
        );
        let mut rows = conn
            .query(&sql, (limit as i64, offset as i64))
            .await
            .map_err(|e| AppError::Database(format!("Failed to list customers: {}", e)))?;

        let mut customers = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            customers.push(customer_from_row(&row)?);
        }

        Ok((customers, total))
    }
}

async fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL", table);

    let mut rows = conn
        .query(&sql, ())
        .await
        .map_err(|e| AppError::Database(format!("Failed to count {}: {}", table, e)))?;

    match rows
        .next()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        Some(row) => row
            .get::<i64>(0)
            .map_err(|e| AppError::Database(e.to_string())),
        None => Ok(0),
    }
}

/// Unique violations become `ConstraintViolation`, everything else `Database`.
fn write_error(action: &str, e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        AppError::ConstraintViolation(format!("Failed to {}: duplicate value", action))
    } else {
        AppError::Database(format!("Failed to {}: {}", action, message))
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        role: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
        updated_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
    })
}

fn customer_from_row(row: &Row) -> Result<Customer> {
    Ok(Customer {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        phone: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        address: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
        updated_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
    })
}
