pub mod audit;
pub mod customers;
pub mod orders;
pub mod outlets;
pub mod pos_referral;
pub mod referral_codes;
pub mod settings;

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::config::CONFIG;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "POS Referral API"),
    paths(
        outlets::create_outlet,
        outlets::list_outlets,
        settings::get_referral_settings,
        settings::update_referral_settings,
        customers::create_customer,
        customers::list_customers,
        customers::get_customer,
        referral_codes::generate_code,
        referral_codes::list_codes,
        referral_codes::get_code,
        referral_codes::set_code_active,
        referral_codes::redeem_code,
        pos_referral::check_code,
        orders::commit_order,
        orders::get_receipt,
        audit::list_audit_logs,
    ),
    tags(
        (name = "Outlets"),
        (name = "Customers"),
        (name = "Referral Codes"),
        (name = "Orders"),
        (name = "Audit"),
    )
)]
pub struct ApiDoc;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/system/version", get(get_version))
        .route("/api/openapi.json", get(openapi_document))
        .nest("/api", api_routes(state.clone()))
        .nest("/pos_referral", pos_referral::pos_referral_routes(state))
}

/// API routes under /api/*
fn api_routes(state: AppState) -> Router {
    Router::new()
        .nest(
            "/outlets",
            outlets::outlets_routes(state.clone()).merge(settings::settings_routes(state.clone())),
        )
        .nest("/customers", customers::customers_routes(state.clone()))
        .nest(
            "/referral-codes",
            referral_codes::referral_codes_routes(state.clone()),
        )
        .nest("/orders", orders::orders_routes(state.clone()))
        .nest("/audit", audit::audit_routes(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": CONFIG.version,
        "commit_hash": CONFIG.commit_hash,
        "build_time": CONFIG.build_time,
        "backend": "rust"
    }))
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
