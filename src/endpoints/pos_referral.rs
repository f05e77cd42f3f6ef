use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use sea_orm::EntityTrait;

use crate::error::Result;
use crate::models::prelude::*;
use crate::schemas::{CheckCodeRequest, CheckCodeResponse};
use crate::services::failure::ReferralFailure;
use crate::services::ledger;
use crate::state::AppState;

const VALID_CODE_MESSAGE: &str = "Valid code";

/// Create the till-facing routes
pub fn pos_referral_routes(state: AppState) -> Router {
    Router::new()
        .route("/check_code", post(check_code))
        .with_state(state)
}

/// Check whether a code can currently be redeemed.
///
/// Always answers 200; an unusable code is reported through `valid` and
/// `message`. Nothing is written.
#[utoipa::path(
    post,
    path = "/pos_referral/check_code",
    tag = "Referral Codes",
    request_body = CheckCodeRequest,
    responses(
        (status = 200, body = CheckCodeResponse)
    )
)]
pub async fn check_code(
    State(state): State<AppState>,
    Json(request): Json<CheckCodeRequest>,
) -> Result<Json<CheckCodeResponse>> {
    let Some(record) = ledger::find_by_code(&state.db, &request.code).await? else {
        return Ok(Json(CheckCodeResponse {
            valid: false,
            message: ReferralFailure::CodeNotFound.message(),
            customer_name: None,
        }));
    };

    let customer_name = Customer::find_by_id(record.customer_id)
        .one(&state.db)
        .await?
        .map(|c| c.name);

    let response = match ledger::is_valid(&record, Utc::now()) {
        Ok(()) => CheckCodeResponse {
            valid: true,
            message: VALID_CODE_MESSAGE.to_string(),
            customer_name,
        },
        Err(failure) => CheckCodeResponse {
            valid: false,
            message: failure.message(),
            customer_name,
        },
    };

    tracing::debug!(
        "Checked referral code {}: valid={}",
        record.code,
        response.valid
    );

    Ok(Json(response))
}
