use crate::types::{AppError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

/// One-way credential hashing.
///
/// Implementations must salt every call, so hashing the same plaintext twice
/// yields two different strings that both verify.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password into a self-describing hash string.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Returns `Ok(false)` on mismatch. Errors only when `hash` is malformed.
    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool>;
}

/// Argon2id hasher with fixed default parameters, producing PHC strings.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Hashing(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Hashing(format!("Invalid password hash: {}", e)))?;

        match self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(AppError::Hashing(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}
