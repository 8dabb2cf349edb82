//! Account management handlers.
//!
//! Every route here sits behind the gate. Profiles never expose the password
//! hash or the active token.

use crate::{
    api::extract::{Json, Query},
    auth::validation,
    db::UserUpdate,
    types::{AccountProfile, AppError, MessageResponse, RegisterRequest, Result, UpdateUserRequest},
    utils::pagination::{Page, PageQuery, Paginated},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

/// Create an account on behalf of someone else.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountProfile),
        (status = 400, description = "Invalid email or weak password"),
        (status = 409, description = "Account already exists")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountProfile>)> {
    let profile = state
        .auth_service
        .register(&payload.email, &payload.password, payload.name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// List accounts, paginated.
#[utoipa::path(
    get,
    path = "/api/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of accounts"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<AccountProfile>>> {
    let page = Page::resolve(query, &state.config.pagination);
    let (users, total) = state.db.list_users(page.limit, page.offset()).await?;

    let profiles = users.into_iter().map(AccountProfile::from).collect();
    Ok(Json(Paginated::new(profiles, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountProfile),
        (status = 404, description = "Account not found")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountProfile>> {
    let user = state
        .db
        .get_user_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user.into()))
}

/// Update email, name and/or password. A new password ends the account's session.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountProfile),
        (status = 400, description = "Invalid email or weak password"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<AccountProfile>> {
    let email = non_empty(payload.email);
    if let Some(ref email) = email {
        validation::validate_email(email)?;
    }

    let password_hash = match non_empty(payload.password) {
        Some(password) => {
            validation::validate_password(&password)?;
            Some(state.auth_service.hash_password(&password)?)
        }
        None => None,
    };

    let update = UserUpdate {
        email,
        name: payload.name.map(|n| n.trim().to_string()),
        password_hash,
    };

    let user = state.db.update_user(&id, &update).await?;
    tracing::info!(user_id = %user.id, "account updated");

    Ok(Json(user.into()))
}

/// Soft-delete an account. Its session ends with it.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "Account not found")
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_user(&id).await?;
    tracing::info!(user_id = %id, "account deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
