use crate::{
    api::extract::Json,
    auth::middleware::{AuthUser, BearerToken},
    types::{
        AccountProfile, AppError, LoginRequest, MessageResponse, RegisterRequest, Result,
        TokenResponse,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = AccountProfile),
        (status = 400, description = "Invalid email or weak password"),
        (status = 409, description = "Account already exists")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountProfile>)> {
    let profile = state
        .auth_service
        .register(&payload.email, &payload.password, payload.name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let tokens = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(tokens))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Missing, invalid or already revoked token")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>> {
    state.auth_service.logout(&token).await?;

    Ok(Json(MessageResponse::new("Logout successful")))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current account", body = AccountProfile),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<AccountProfile>> {
    let user = state
        .db
        .get_user_by_id(&claims.sub)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(Json(user.into()))
}
