use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::error::Result;
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::schemas::{CommitOrderRequest, CommitOrderResponse, ReceiptReferral};
use crate::services::{orders, AuditEvent};
use crate::state::AppState;

/// Create order routes
pub fn orders_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(commit_order))
        .route("/{id}/receipt", get(get_receipt))
        .with_state(state)
}

/// Commit a finalised order and credit the referrer when it consumed a
/// redemption. Re-sending a commit for an already consumed redemption answers
/// 200 with the original order.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CommitOrderRequest,
    responses(
        (status = 201, body = CommitOrderResponse),
        (status = 200, description = "Redemption already committed", body = CommitOrderResponse),
        (status = 400, description = "Redemption belongs to another outlet"),
        (status = 404, description = "Unknown outlet or redemption"),
        (status = 422, description = "Invalid order")
    )
)]
pub async fn commit_order(
    State(state): State<AppState>,
    Json(request): Json<CommitOrderRequest>,
) -> Result<(StatusCode, Json<CommitOrderResponse>)> {
    request.validate()?;

    let committed = orders::commit_order(&state.db, &request).await?;

    if committed.replayed {
        return Ok((
            StatusCode::OK,
            Json(CommitOrderResponse {
                order: committed.order.into(),
                reward: committed.reward.map(Into::into),
            }),
        ));
    }

    let order = &committed.order;

    state
        .audit
        .log_success(
            AuditEvent::new(AuditAction::OrderCommitted, ResourceType::Order)
                .resource(order.id)
                .outlet(order.outlet_id)
                .details(serde_json::json!({
                    "amount_total": order.amount_total,
                    "redemption_id": request.redemption_id,
                    "used_referral_code": order.used_referral_code,
                    "referral_discount": order.referral_discount,
                })),
        )
        .await;

    if let Some(reward) = &committed.reward {
        state
            .audit
            .log_success(
                AuditEvent::new(AuditAction::RewardCreated, ResourceType::Reward)
                    .resource(reward.id)
                    .outlet(order.outlet_id)
                    .details(serde_json::json!({
                        "order_id": reward.order_id,
                        "referrer_id": reward.referrer_id,
                        "amount": reward.amount,
                    })),
            )
            .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(CommitOrderResponse {
            order: committed.order.into(),
            reward: committed.reward.map(Into::into),
        }),
    ))
}

/// Referral lines for an order's receipt
#[utoipa::path(
    get,
    path = "/api/orders/{id}/receipt",
    tag = "Orders",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, body = ReceiptReferral),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<ReceiptReferral>> {
    Ok(Json(orders::receipt(&state.db, order_id).await?))
}
