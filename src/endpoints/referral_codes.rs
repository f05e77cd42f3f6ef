use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::referral_code;
use crate::schemas::{
    GenerateCodeRequest, RedeemRequest, RedeemResponse, ReferralCodeQuery, ReferralCodeResponse,
    SetActiveRequest,
};
use crate::services::orders::{self, CodeRequest};
use crate::services::redemption::{self, RedemptionOutcome};
use crate::services::{ledger, AuditEvent};
use crate::state::{AppState, DbConn};

/// Create referral code routes
pub fn referral_codes_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_codes).post(generate_code))
        .route("/redeem", post(redeem_code))
        .route("/{code}", get(get_code))
        .route("/{code}/active", put(set_code_active))
        .with_state(state)
}

async fn find_code(db: &DbConn, code: &str) -> Result<referral_code::Model> {
    ledger::find_by_code(db, code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Referral code {} not found", code)))
}

/// Generate and store a new referral code for a customer
#[utoipa::path(
    post,
    path = "/api/referral-codes",
    tag = "Referral Codes",
    request_body = GenerateCodeRequest,
    responses(
        (status = 201, body = ReferralCodeResponse),
        (status = 404, description = "Unknown outlet, customer or order"),
        (status = 409, body = crate::services::FailureBody),
        (status = 422, body = crate::services::FailureBody)
    )
)]
pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<GenerateCodeRequest>,
) -> Result<(StatusCode, Json<ReferralCodeResponse>)> {
    request.validate()?;

    let code_request = CodeRequest {
        outlet_id: request.outlet_id,
        customer_id: request.customer_id,
        phone_number: request.phone_number,
        order_id: request.order_id,
    };
    let mut rng = StdRng::from_os_rng();

    let code = match orders::create_referral_code(
        &state.db,
        &code_request,
        &mut rng,
        state.referral.code_max_attempts,
    )
    .await
    {
        Ok(code) => code,
        Err(AppError::Referral(failure)) => {
            state
                .audit
                .log_failure(
                    AuditEvent::new(AuditAction::CodeGenerated, ResourceType::ReferralCode)
                        .outlet(request.outlet_id)
                        .details(serde_json::json!({ "customer_id": request.customer_id })),
                    failure.code(),
                )
                .await;
            return Err(failure.into());
        }
        Err(e) => return Err(e),
    };

    state
        .audit
        .log_success(
            AuditEvent::new(AuditAction::CodeGenerated, ResourceType::ReferralCode)
                .resource(&code.code)
                .outlet(code.outlet_id)
                .details(serde_json::json!({
                    "customer_id": code.customer_id,
                    "order_id": code.order_id,
                    "max_uses": code.max_uses,
                })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(code.into())))
}

/// List referral codes
#[utoipa::path(
    get,
    path = "/api/referral-codes",
    tag = "Referral Codes",
    params(ReferralCodeQuery),
    responses(
        (status = 200, body = Vec<ReferralCodeResponse>)
    )
)]
pub async fn list_codes(
    State(state): State<AppState>,
    Query(query): Query<ReferralCodeQuery>,
) -> Result<Json<Vec<ReferralCodeResponse>>> {
    let codes = ledger::list(&state.db, &query.into()).await?;
    Ok(Json(codes.into_iter().map(ReferralCodeResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/referral-codes/{code}",
    tag = "Referral Codes",
    params(("code" = String, Path, description = "Referral code")),
    responses(
        (status = 200, body = ReferralCodeResponse),
        (status = 404, description = "Referral code not found")
    )
)]
pub async fn get_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ReferralCodeResponse>> {
    let record = find_code(&state.db, &code).await?;
    Ok(Json(record.into()))
}

/// Switch a code on or off
#[utoipa::path(
    put,
    path = "/api/referral-codes/{code}/active",
    tag = "Referral Codes",
    params(("code" = String, Path, description = "Referral code")),
    request_body = SetActiveRequest,
    responses(
        (status = 200, body = ReferralCodeResponse),
        (status = 404, description = "Referral code not found")
    )
)]
pub async fn set_code_active(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ReferralCodeResponse>> {
    let record = find_code(&state.db, &code).await?;
    let updated = ledger::set_active(&state.db, record.id, request.is_active).await?;

    let action = if updated.is_active {
        AuditAction::CodeActivated
    } else {
        AuditAction::CodeDeactivated
    };
    state
        .audit
        .log_success(
            AuditEvent::new(action, ResourceType::ReferralCode)
                .resource(&updated.code)
                .outlet(updated.outlet_id),
        )
        .await;

    Ok(Json(updated.into()))
}

/// Apply a referral code to an order amount
#[utoipa::path(
    post,
    path = "/api/referral-codes/redeem",
    tag = "Referral Codes",
    request_body = RedeemRequest,
    responses(
        (status = 200, body = RedeemResponse),
        (status = 404, body = crate::services::FailureBody),
        (status = 422, body = crate::services::FailureBody)
    )
)]
pub async fn redeem_code(
    State(state): State<AppState>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>> {
    request.validate()?;

    let outcome = redemption::redeem(
        &state.db,
        &request.code,
        request.order_amount,
        request.outlet_id,
        Utc::now(),
    )
    .await?;

    match outcome {
        RedemptionOutcome::Redeemed {
            redemption_id,
            code_id,
            code,
            referrer_id,
            discount_amount,
        } => {
            state
                .audit
                .log_success(
                    AuditEvent::new(AuditAction::CodeRedeemed, ResourceType::ReferralCode)
                        .resource(&code)
                        .outlet(request.outlet_id)
                        .details(serde_json::json!({
                            "redemption_id": redemption_id,
                            "code_id": code_id,
                            "referrer_id": referrer_id,
                            "order_amount": request.order_amount,
                            "discount_amount": discount_amount,
                        })),
                )
                .await;

            Ok(Json(RedeemResponse {
                success: true,
                redemption_id,
                code,
                discount_amount,
            }))
        }
        RedemptionOutcome::Rejected(failure) => {
            state
                .audit
                .log_failure(
                    AuditEvent::new(AuditAction::RedemptionRejected, ResourceType::ReferralCode)
                        .resource(request.code.trim().to_uppercase())
                        .outlet(request.outlet_id)
                        .details(serde_json::json!({ "order_amount": request.order_amount })),
                    failure.code(),
                )
                .await;

            Err(failure.into())
        }
    }
}
