//! Auth flow tests against a mock store.
//!
//! These exercise `AuthService` end to end without SQLite, so the tests can
//! look at exactly what reached storage.

mod common;

use chrono::Duration;
use clientbook::auth::{
    jwt::TokenService,
    password::{Argon2Hasher, CredentialHasher},
    service::AuthService,
    session::hash_token,
};
use clientbook::db::{DatabaseClient, UserUpdate};
use clientbook::types::{AppError, Result};
use common::mocks::MockDatabase;
use std::sync::Arc;

const SECRET: &str = "auth_flow_test_secret_value";

fn service_with(db: Arc<MockDatabase>) -> AuthService {
    let tokens = TokenService::new(SECRET, Duration::hours(24)).unwrap();
    AuthService::new(db, Arc::new(Argon2Hasher::new()), tokens).unwrap()
}

/// Plaintext "hasher" so several logins fit inside one clock second.
struct InstantHasher;

impl CredentialHasher for InstantHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("plain:{}", plaintext))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        Ok(hash.strip_prefix("plain:") == Some(plaintext))
    }
}

fn setup() -> (Arc<MockDatabase>, AuthService) {
    let db = Arc::new(MockDatabase::new());
    let service = service_with(db.clone());
    (db, service)
}

#[tokio::test]
async fn test_weak_password_never_reaches_storage() {
    let (db, service) = setup();

    for password in ["abc", "short1A", "alllowercase1", "NoDigitsHere", ""] {
        let result = service.register("ada@example.com", password, None).await;
        assert!(
            matches!(result, Err(AppError::InvalidInput(_))),
            "password {:?} should be rejected",
            password
        );
    }

    assert_eq!(db.write_count(), 0);
}

#[tokio::test]
async fn test_invalid_email_never_reaches_storage() {
    let (db, service) = setup();

    for email in ["", "not-an-email", "a@b", "@example.com"] {
        let result = service.register(email, "Password1", None).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    assert_eq!(db.write_count(), 0);
}

#[tokio::test]
async fn test_register_returns_profile() {
    let (db, service) = setup();

    let profile = service
        .register("  ada@example.com ", "Password1", Some("Ada"))
        .await
        .unwrap();

    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.role, "user");
    assert_eq!(db.write_count(), 1);

    let stored = db.get_user_by_id(&profile.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "Password1");
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert!(db.stored_token(&profile.id).is_none());
}

#[tokio::test]
async fn test_duplicate_registration() {
    let (_db, service) = setup();

    service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();
    let result = service
        .register("ada@example.com", "Different2", None)
        .await;

    assert!(matches!(result, Err(AppError::DuplicateAccount)));
}

#[tokio::test]
async fn test_login_stores_digest_not_token() {
    let (db, service) = setup();
    let profile = service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();

    let session = service.login("ada@example.com", "Password1").await.unwrap();

    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.expires_in, 24 * 3600);
    let stored = db.stored_token(&profile.id).expect("token should be stored");
    assert_ne!(stored, session.token);
    assert_eq!(stored, hash_token(&session.token));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (_db, service) = setup();
    service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();

    let unknown = service
        .login("nobody@example.com", "Password1")
        .await
        .unwrap_err();
    let wrong = service
        .login("ada@example.com", "Password2")
        .await
        .unwrap_err();

    assert!(matches!(unknown, AppError::InvalidCredentials));
    assert!(matches!(wrong, AppError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (db, service) = setup();

    assert!(matches!(
        service.login("", "Password1").await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        service.login("ada@example.com", "").await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(db.write_count(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_not_reported_as_bad_credentials() {
    let db = Arc::new(MockDatabase::failing());
    let service = service_with(db);

    let result = service.login("ada@example.com", "Password1").await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_authenticate_and_logout() {
    let (db, service) = setup();
    let profile = service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();
    let session = service.login("ada@example.com", "Password1").await.unwrap();

    let claims = service.authenticate(&session.token).await.unwrap();
    assert_eq!(claims.sub, profile.id);
    assert_eq!(claims.username, "ada@example.com");

    service.logout(&session.token).await.unwrap();
    assert!(db.stored_token(&profile.id).is_none());

    assert!(matches!(
        service.authenticate(&session.token).await,
        Err(AppError::Unauthenticated)
    ));
    assert!(matches!(
        service.logout(&session.token).await,
        Err(AppError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_password_change_ends_session() {
    let (db, service) = setup();
    let profile = service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();
    let session = service.login("ada@example.com", "Password1").await.unwrap();

    let update = UserUpdate {
        password_hash: Some(service.hash_password("Password2").unwrap()),
        ..UserUpdate::default()
    };
    db.update_user(&profile.id, &update).await.unwrap();

    assert!(matches!(
        service.authenticate(&session.token).await,
        Err(AppError::Unauthenticated)
    ));
    assert!(service.login("ada@example.com", "Password1").await.is_err());
    assert!(service.login("ada@example.com", "Password2").await.is_ok());
}

#[tokio::test]
async fn test_deleted_account_token_rejected() {
    let (db, service) = setup();
    let profile = service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();
    let session = service.login("ada@example.com", "Password1").await.unwrap();

    db.delete_user(&profile.id).await.unwrap();

    assert!(matches!(
        service.authenticate(&session.token).await,
        Err(AppError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let (_db, service) = setup();
    let profile = service
        .register("ada@example.com", "Password1", None)
        .await
        .unwrap();

    let foreign = TokenService::new("some_other_secret_value", Duration::hours(1)).unwrap();
    let token = foreign
        .issue(&profile.id, &profile.email, &profile.role)
        .unwrap();

    assert!(matches!(
        service.authenticate(&token).await,
        Err(AppError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_back_to_back_logins_supersede() {
    let db = Arc::new(MockDatabase::new());
    let tokens = TokenService::new(SECRET, Duration::hours(24)).unwrap();
    let service = AuthService::new(db.clone(), Arc::new(InstantHasher), tokens).unwrap();
    let profile = service
        .register("a@b.com", "StrongPass1", None)
        .await
        .unwrap();

    let first = service.login("a@b.com", "StrongPass1").await.unwrap();
    let second = service.login("a@b.com", "StrongPass1").await.unwrap();

    assert_ne!(first.token, second.token);
    assert_eq!(db.stored_token(&profile.id), Some(hash_token(&second.token)));
    assert!(matches!(
        service.authenticate(&first.token).await,
        Err(AppError::Unauthenticated)
    ));
    assert!(service.authenticate(&second.token).await.is_ok());
}
