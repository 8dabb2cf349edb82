use crate::types::{AppError, Claims, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

/// Default session token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Why a presented token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,
}

/// Issues and validates HS256 session tokens.
///
/// The signing secret is fixed at construction and never changes for the
/// lifetime of the service.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service. Fails when the secret is empty.
    ///
    /// # Arguments
    /// * `jwt_secret` - Symmetric signing secret (should be at least 32 chars)
    /// * `ttl` - How long an issued token stays valid
    pub fn new(jwt_secret: &str, ttl: Duration) -> Result<Self> {
        if jwt_secret.trim().is_empty() {
            return Err(AppError::Config("JWT secret must not be empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            ttl,
        })
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Builds the claims a token issued right now would carry.
    pub fn claims_for(&self, subject_id: &str, username: &str, role: &str) -> Claims {
        let now = Utc::now();

        Claims {
            sub: subject_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (now + self.ttl).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Signs an arbitrary claims value.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Issues a token for the given identity, expiring `ttl` from now.
    pub fn issue(&self, subject_id: &str, username: &str, role: &str) -> Result<String> {
        self.sign(&self.claims_for(subject_id, username, role))
    }

    /// Verifies signature, shape and expiry, returning the embedded claims.
    pub fn validate(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below so that a token is dead at exactly `exp`
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        let now = Utc::now().timestamp();
        if now >= claims.exp as i64 {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
