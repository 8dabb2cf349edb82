//! TOML-based configuration for Clientbook
//!
//! This module provides declarative configuration for the server, the auth
//! core, storage and pagination via a TOML file (`clientbook.toml`).
//!
//! Secrets never live in the file. The file names the environment variable
//! that holds them, and the value is resolved once at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from clientbook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

/// Longest token lifetime a config may ask for (ten years).
pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365 * 10;

fn default_jwt_expiry_hours() -> i64 {
    crate::auth::jwt::DEFAULT_TOKEN_TTL_HOURS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            jwt_expiry_hours: default_jwt_expiry_hours(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/clientbook.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Pagination Configuration =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: u32,

    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_page_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Environment variable '{0}' referenced in config is empty")]
    EmptyEnvVar(String),
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Parse without validating
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration for internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Fail fast: the server cannot sign tokens without a secret
        self.jwt_secret()?;

        self.token_ttl()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must not be 0".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'pretty' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        let pagination = &self.pagination;
        if pagination.default_limit == 0 || pagination.max_limit == 0 {
            return Err(ConfigError::ValidationError(
                "pagination limits must be positive".to_string(),
            ));
        }
        if pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::ValidationError(format!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                pagination.default_limit, pagination.max_limit
            )));
        }

        // Validate database env vars if specified
        if let Some(ref env) = self.database.turso_url_env {
            self.require_env(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.require_env(env)?;
        }

        Ok(())
    }

    fn require_env(&self, name: &str) -> Result<String, ConfigError> {
        let value =
            std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyEnvVar(name.to_string()));
        }
        Ok(value)
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.require_env(&self.auth.jwt_secret_env)
    }

    /// Token lifetime as a chrono duration. Fails outside `1..=MAX_JWT_EXPIRY_HOURS`.
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        let hours = self.auth.jwt_expiry_hours;
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&hours) {
            return Err(ConfigError::ValidationError(format!(
                "auth.jwt_expiry_hours must be between 1 and {}, got {}",
                MAX_JWT_EXPIRY_HOURS, hours
            )));
        }

        chrono::Duration::try_hours(hours).ok_or_else(|| {
            ConfigError::ValidationError(format!("auth.jwt_expiry_hours {} overflows", hours))
        })
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Storage backend selected by the `[database]` section
    pub fn database_provider(&self) -> Result<crate::db::DatabaseProvider, ConfigError> {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&self.database.turso_url_env, &self.database.turso_token_env)
            {
                return Ok(crate::db::DatabaseProvider::Turso {
                    url: self.require_env(url_env)?,
                    auth_token: self.require_env(token_env)?,
                });
            }
        }

        Ok(crate::db::DatabaseProvider::from_url(&self.database.url))
    }
}
