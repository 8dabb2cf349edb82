//! Input validation for credentials and contact details.

use crate::types::{AppError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least eight characters with one ASCII uppercase letter and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::InvalidInput("Invalid email format".to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters and include 1 uppercase letter and 1 number",
            MIN_PASSWORD_LENGTH
        )))
    }
}

/// Validates a registration pair, email first.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    validate_email(email)?;
    validate_password(password)
}
