//! Configuration and request helpers.

/// Page/limit handling for list endpoints.
pub mod pagination;
/// TOML configuration loading and validation.
pub mod toml_config;
