use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::customer;
use crate::models::prelude::*;
use crate::schemas::{CreateCustomer, CustomerResponse};
use crate::state::AppState;

/// Create customer routes
pub fn customers_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/{id}", get(get_customer))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomer,
    responses(
        (status = 201, body = CustomerResponse),
        (status = 422, description = "Invalid customer")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomer>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    request.validate()?;

    let phone = request
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let customer = customer::ActiveModel {
        name: Set(request.name.trim().to_string()),
        phone: Set(phone),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, body = Vec<CustomerResponse>)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>> {
    let customers = Customer::find()
        .order_by_asc(customer::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, body = CustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponse>> {
    let customer = Customer::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;

    Ok(Json(customer.into()))
}
