use crate::db::DatabaseClient;
use crate::types::Result;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Tracks the single token currently considered valid for each account.
///
/// Only a SHA-256 digest of the token is persisted. Recording a token
/// overwrites whatever was there before, so a new login silently ends any
/// earlier session for the same account.
#[derive(Clone)]
pub struct SessionStore {
    db: Arc<dyn DatabaseClient>,
}

impl SessionStore {
    pub fn new(db: Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }

    /// Makes `token` the account's only active token.
    pub async fn record_active_token(&self, account_id: &str, token: &str) -> Result<()> {
        let digest = hash_token(token);
        self.db.set_active_token(account_id, Some(&digest)).await
    }

    /// Ends the account's session, if any.
    pub async fn clear_active_token(&self, account_id: &str) -> Result<()> {
        self.db.set_active_token(account_id, None).await
    }

    /// True iff `token` is exactly the token on record for the account.
    pub async fn is_active(&self, account_id: &str, token: &str) -> Result<bool> {
        let Some(stored) = self.db.get_active_token(account_id).await? else {
            return Ok(false);
        };

        let presented = hash_token(token);
        Ok(stored.as_bytes().ct_eq(presented.as_bytes()).into())
    }
}

/// Hex-encoded SHA-256 of a token, used as its storage form.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
