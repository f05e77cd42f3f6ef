use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use validator::Validate;

use crate::error::Result;
use crate::models::outlet;
use crate::models::prelude::*;
use crate::schemas::{CreateOutlet, OutletResponse};
use crate::state::AppState;

/// Create outlet routes
pub fn outlets_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_outlets).post(create_outlet))
        .with_state(state)
}

/// Register a new outlet
#[utoipa::path(
    post,
    path = "/api/outlets",
    tag = "Outlets",
    request_body = CreateOutlet,
    responses(
        (status = 201, body = OutletResponse),
        (status = 422, description = "Invalid outlet")
    )
)]
pub async fn create_outlet(
    State(state): State<AppState>,
    Json(request): Json<CreateOutlet>,
) -> Result<(StatusCode, Json<OutletResponse>)> {
    request.validate()?;

    let outlet = outlet::ActiveModel {
        name: Set(request.name.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!("Created outlet {} ({})", outlet.id, outlet.name);

    Ok((StatusCode::CREATED, Json(outlet.into())))
}

/// List all outlets
#[utoipa::path(
    get,
    path = "/api/outlets",
    tag = "Outlets",
    responses(
        (status = 200, body = Vec<OutletResponse>)
    )
)]
pub async fn list_outlets(State(state): State<AppState>) -> Result<Json<Vec<OutletResponse>>> {
    let outlets = Outlet::find()
        .order_by_asc(outlet::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(outlets.into_iter().map(OutletResponse::from).collect()))
}
