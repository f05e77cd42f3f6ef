use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::error::Result;
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::referral_setting;
use crate::schemas::{ReferralSettingsResponse, UpdateReferralSettings};
use crate::services::{settings, AuditEvent};
use crate::state::AppState;

/// Create referral settings routes, nested under /api/outlets
pub fn settings_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/{id}/referral-settings",
            get(get_referral_settings).put(update_referral_settings),
        )
        .with_state(state)
}

/// Get an outlet's referral settings, creating the defaults on first access
#[utoipa::path(
    get,
    path = "/api/outlets/{id}/referral-settings",
    tag = "Outlets",
    params(("id" = i64, Path, description = "Outlet id")),
    responses(
        (status = 200, body = ReferralSettingsResponse),
        (status = 404, body = crate::services::FailureBody)
    )
)]
pub async fn get_referral_settings(
    State(state): State<AppState>,
    Path(outlet_id): Path<i64>,
) -> Result<Json<ReferralSettingsResponse>> {
    let settings = ensure_audited(&state, outlet_id).await?;
    Ok(Json(settings.into()))
}

/// Load settings, recording an audit entry when this request created them
async fn ensure_audited(state: &AppState, outlet_id: i64) -> Result<referral_setting::Model> {
    let (settings, created) = settings::ensure_settings(&state.db, outlet_id).await?;

    if created {
        state
            .audit
            .log_success(
                AuditEvent::new(AuditAction::SettingsCreated, ResourceType::Settings)
                    .resource(settings.id)
                    .outlet(outlet_id)
                    .details(serde_json::json!({
                        "referral_enabled": settings.referral_enabled,
                        "referral_code_prefix": settings.referral_code_prefix,
                    })),
            )
            .await;
    }

    Ok(settings)
}

#[utoipa::path(
    put,
    path = "/api/outlets/{id}/referral-settings",
    tag = "Outlets",
    params(("id" = i64, Path, description = "Outlet id")),
    request_body = UpdateReferralSettings,
    responses(
        (status = 200, body = ReferralSettingsResponse),
        (status = 404, body = crate::services::FailureBody),
        (status = 422, description = "Invalid settings")
    )
)]
pub async fn update_referral_settings(
    State(state): State<AppState>,
    Path(outlet_id): Path<i64>,
    Json(update): Json<UpdateReferralSettings>,
) -> Result<Json<ReferralSettingsResponse>> {
    update.validate()?;

    ensure_audited(&state, outlet_id).await?;
    let updated = settings::update_settings(&state.db, outlet_id, &update).await?;

    tracing::info!("Updated referral settings for outlet {}", outlet_id);
    state
        .audit
        .log_success(
            AuditEvent::new(AuditAction::SettingsUpdated, ResourceType::Settings)
                .resource(updated.id)
                .outlet(outlet_id)
                .details(serde_json::json!({
                    "referral_enabled": updated.referral_enabled,
                    "referrer_percentage": updated.referrer_percentage,
                    "referred_percentage": updated.referred_percentage,
                    "min_order_amount": updated.min_order_amount,
                    "max_uses_per_code": updated.max_uses_per_code,
                })),
        )
        .await;

    Ok(Json(updated.into()))
}
