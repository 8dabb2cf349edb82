use crate::auth::jwt::TokenService;
use crate::auth::password::CredentialHasher;
use crate::auth::session::SessionStore;
use crate::auth::validation;
use crate::db::DatabaseClient;
use crate::types::{AccountProfile, AppError, Claims, Result, TokenResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Role assigned to newly registered accounts.
pub const DEFAULT_ROLE: &str = "user";

/// Verified against when the email is unknown, so both login failures cost one hash.
const DUMMY_PASSWORD: &str = "Dummy-Password-0";

/// Orchestrates registration, login, logout and the per-request gate.
pub struct AuthService {
    db: Arc<dyn DatabaseClient>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: TokenService,
    sessions: SessionStore,
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: TokenService,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        let sessions = SessionStore::new(db.clone());

        Ok(Self {
            db,
            hasher,
            tokens,
            sessions,
            dummy_hash,
        })
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Hashes a new password with the configured hasher.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        self.hasher.hash(password)
    }

    /// Creates an account. Validation happens before any storage access.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AccountProfile> {
        let email = email.trim();
        validation::validate_credentials(email, password)?;

        if self.db.get_user_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateAccount);
        }

        let password_hash = self.hasher.hash(password)?;
        let user_id = Uuid::new_v4().to_string();

        self.db
            .create_user(
                &user_id,
                email,
                &password_hash,
                name.unwrap_or_default(),
                DEFAULT_ROLE,
            )
            .await
            .map_err(|e| match e {
                AppError::ConstraintViolation(_) => AppError::DuplicateAccount,
                other => other,
            })?;

        let user = self
            .db
            .get_user_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::Internal("Created account disappeared".to_string()))?;

        info!(user_id = %user.id, "account registered");
        Ok(user.into())
    }

    /// Verifies credentials and starts a new session, superseding any prior one.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.db.get_user_by_email(email).await? else {
            let _ = self.hasher.verify(&self.dummy_hash, password);
            warn!("login rejected: unknown account");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(&user.password_hash, password)? {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id, &user.email, &user.role)?;
        self.sessions.record_active_token(&user.id, &token).await?;

        info!(user_id = %user.id, "login successful");
        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Ends the session identified by `token`.
    ///
    /// Fails with `Unauthenticated` once the token has already been cleared or
    /// superseded, so a repeated logout is harmless.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let claims = self.authenticate(token).await?;

        self.sessions
            .clear_active_token(&claims.sub)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::Unauthenticated,
                other => other,
            })?;

        info!(user_id = %claims.sub, "logout successful");
        Ok(())
    }

    /// The gate: the token must verify and still be the account's active token.
    pub async fn authenticate(&self, token: &str) -> Result<Claims> {
        let claims = self.tokens.validate(token).map_err(|e| {
            debug!(reason = %e, "gate rejected token");
            AppError::Unauthenticated
        })?;

        if !self.sessions.is_active(&claims.sub, token).await? {
            debug!(user_id = %claims.sub, "gate rejected token: session no longer active");
            return Err(AppError::Unauthenticated);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::Argon2Hasher;
    use crate::db::TursoClient;
    use chrono::Duration;

    async fn create_test_service() -> AuthService {
        let db = TursoClient::new_memory()
            .await
            .expect("Failed to create in-memory database");
        let tokens = TokenService::new("test_jwt_secret_key_for_testing_only", Duration::hours(24))
            .expect("valid secret");

        AuthService::new(Arc::new(db), Arc::new(Argon2Hasher::new()), tokens)
            .expect("service should build")
    }

    #[tokio::test]
    async fn test_register_returns_profile() {
        let service = create_test_service().await;

        let profile = service
            .register("a@b.com", "StrongPass1", Some("Alice"))
            .await
            .expect("registration should succeed");

        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.role, DEFAULT_ROLE);
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let service = create_test_service().await;
        service.register("a@b.com", "StrongPass1", None).await.unwrap();

        let result = service.register("a@b.com", "OtherPass2", None).await;
        assert!(matches!(result, Err(AppError::DuplicateAccount)));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let service = create_test_service().await;

        let result = service.register("a@b.com", "abc", None).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = create_test_service().await;
        service.register("a@b.com", "StrongPass1", None).await.unwrap();

        let unknown = service.login("nobody@b.com", "StrongPass1").await;
        let wrong = service.login("a@b.com", "WrongPass1").await;

        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_then_gate() {
        let service = create_test_service().await;
        let profile = service.register("a@b.com", "StrongPass1", None).await.unwrap();

        let tokens = service.login("a@b.com", "StrongPass1").await.unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 24 * 60 * 60);

        let claims = service.authenticate(&tokens.token).await.unwrap();
        assert_eq!(claims.sub, profile.id);
        assert_eq!(claims.username, "a@b.com");
        assert_eq!(claims.role, DEFAULT_ROLE);
    }

    #[tokio::test]
    async fn test_second_login_supersedes_first() {
        let service = create_test_service().await;
        service.register("a@b.com", "StrongPass1", None).await.unwrap();

        let first = service.login("a@b.com", "StrongPass1").await.unwrap();
        let second = service.login("a@b.com", "StrongPass1").await.unwrap();
        assert_ne!(first.token, second.token);

        // Still cryptographically valid, but no longer on record
        assert!(service.tokens().validate(&first.token).is_ok());
        assert!(matches!(
            service.authenticate(&first.token).await,
            Err(AppError::Unauthenticated)
        ));
        assert!(service.authenticate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let service = create_test_service().await;
        service.register("a@b.com", "StrongPass1", None).await.unwrap();
        let tokens = service.login("a@b.com", "StrongPass1").await.unwrap();

        service.logout(&tokens.token).await.expect("first logout succeeds");

        assert!(matches!(
            service.logout(&tokens.token).await,
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            service.authenticate(&tokens.token).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_logout_rejects_garbage() {
        let service = create_test_service().await;

        assert!(matches!(
            service.logout("not-a-token").await,
            Err(AppError::Unauthenticated)
        ));
    }
}
