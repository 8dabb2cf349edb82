//! Customer record handlers.

use super::users::non_empty;
use crate::{
    api::extract::{Json, Query},
    auth::validation,
    db::{CustomerUpdate, NewCustomer},
    types::{
        AppError, CreateCustomerRequest, CustomerResponse, MessageResponse, Result,
        UpdateCustomerRequest,
    },
    utils::pagination::{Page, PageQuery, Paginated},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Missing name/phone or invalid email"),
        (status = 409, description = "Email already in use")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    let name = payload.name.trim();
    let phone = payload.phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(AppError::InvalidInput(
            "Customer name and phone are required".to_string(),
        ));
    }

    let email = non_empty(payload.email);
    if let Some(ref email) = email {
        validation::validate_email(email)?;
    }

    let customer = NewCustomer {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        address: non_empty(payload.address),
    };

    let created = state.db.create_customer(&customer).await?;
    tracing::info!(customer_id = %created.id, "customer created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of customers"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<CustomerResponse>>> {
    let page = Page::resolve(query, &state.config.pagination);
    let (customers, total) = state.db.list_customers(page.limit, page.offset()).await?;

    let data = customers.into_iter().map(CustomerResponse::from).collect();
    Ok(Json(Paginated::new(data, total, page)))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>> {
    let customer = state
        .db
        .get_customer(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;

    Ok(Json(customer.into()))
}

/// Update a customer. Empty or missing fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = CustomerResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    let email = non_empty(payload.email);
    if let Some(ref email) = email {
        validation::validate_email(email)?;
    }

    let update = CustomerUpdate {
        name: non_empty(payload.name),
        email,
        phone: non_empty(payload.phone),
        address: non_empty(payload.address),
    };

    let customer = state.db.update_customer(&id, &update).await?;
    Ok(Json(customer.into()))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_customer(&id).await?;
    tracing::info!(customer_id = %id, "customer deleted");

    Ok(Json(MessageResponse::new("Customer deleted successfully")))
}
