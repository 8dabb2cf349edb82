use crate::auth::service::AuthService;
use crate::types::{AppError, Claims};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then_some(token)
}

/// Rejects requests without an active session and attaches the caller's claims.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        tracing::debug!("gate rejected request: missing or malformed bearer token");
        AppError::Unauthenticated
    })?;

    let claims = auth_service.authenticate(token).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for the claims attached by [`auth_middleware`].
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Extractor for the raw bearer token of a request.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    mod gate {
        use super::super::*;
        use crate::auth::{jwt::TokenService, password::Argon2Hasher};
        use crate::db::TursoClient;
        use axum::{body::Body, http::StatusCode, routing::get, Router};
        use tower::ServiceExt;

        async fn whoami(AuthUser(claims): AuthUser) -> String {
            claims.username
        }

        async fn protected_app() -> (Router, Arc<AuthService>) {
            let db = Arc::new(TursoClient::new_memory().await.unwrap());
            let tokens =
                TokenService::new("middleware_test_secret", chrono::Duration::hours(1)).unwrap();
            let auth = Arc::new(
                AuthService::new(db, Arc::new(Argon2Hasher::new()), tokens).unwrap(),
            );

            let app = Router::new()
                .route("/whoami", get(whoami))
                .layer(axum::middleware::from_fn_with_state(
                    auth.clone(),
                    auth_middleware,
                ));
            (app, auth)
        }

        fn request(token: Option<&str>) -> axum::http::Request<Body> {
            let builder = axum::http::Request::builder().uri("/whoami");
            let builder = match token {
                Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
                None => builder,
            };
            builder.body(Body::empty()).unwrap()
        }

        #[tokio::test]
        async fn test_gate_attaches_claims() {
            let (app, auth) = protected_app().await;
            auth.register("gate@example.com", "Password1", None)
                .await
                .unwrap();
            let session = auth.login("gate@example.com", "Password1").await.unwrap();

            let response = app.oneshot(request(Some(&session.token))).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(&body[..], b"gate@example.com");
        }

        #[tokio::test]
        async fn test_gate_rejects_missing_and_revoked_tokens() {
            let (app, auth) = protected_app().await;
            auth.register("gate@example.com", "Password1", None)
                .await
                .unwrap();
            let session = auth.login("gate@example.com", "Password1").await.unwrap();
            auth.logout(&session.token).await.unwrap();

            let missing = app.clone().oneshot(request(None)).await.unwrap();
            assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

            let revoked = app.oneshot(request(Some(&session.token))).await.unwrap();
            assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
