//! Shared fixtures for integration tests: an in-memory database, seed records
//! and a helper for driving the router.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use pos_referral::config::referral::ReferralConfig;
use pos_referral::migrations::Migrator;
use pos_referral::models::{customer, outlet, referral_code, referral_setting};
use pos_referral::schemas::UpdateReferralSettings;
use pos_referral::services::ledger::{self, NewReferralCode};
use pos_referral::services::{settings, AuditService};
use pos_referral::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

pub async fn create_outlet(db: &DatabaseConnection, name: &str) -> outlet::Model {
    outlet::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create outlet")
}

pub async fn create_customer(
    db: &DatabaseConnection,
    name: &str,
    phone: Option<&str>,
) -> customer::Model {
    customer::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(phone.map(str::to_string)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create customer")
}

/// Apply settings to an outlet, creating its defaults first
pub async fn configure_outlet(
    db: &DatabaseConnection,
    outlet_id: i64,
    update: UpdateReferralSettings,
) -> referral_setting::Model {
    settings::update_settings(db, outlet_id, &update)
        .await
        .expect("Failed to configure outlet")
}

/// Store a code with a fixed string, bypassing generation
pub async fn store_code(
    db: &DatabaseConnection,
    code: &str,
    outlet_id: i64,
    customer_id: i64,
    max_uses: i32,
) -> referral_code::Model {
    let new = NewReferralCode {
        customer_id,
        phone_number: None,
        order_id: None,
        outlet_id,
        max_uses,
        validity_days: 365,
    };
    ledger::create(db, code, &new)
        .await
        .expect("Failed to store referral code")
}

/// Build an application state around an existing database
pub fn build_test_state(db: DatabaseConnection) -> AppState {
    let audit = AuditService::new(db.clone());
    AppState::new(db, audit, ReferralConfig::default())
}

/// Send a request through the router and return (status, JSON body).
///
/// Non-JSON bodies come back as a JSON string.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, json)
}
