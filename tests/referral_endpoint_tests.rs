//! Referral HTTP endpoint tests
//!
//! Covers:
//! - `POST /api/referral-codes`: generation from outlet settings
//! - `POST /pos_referral/check_code`: validity check with owner name
//! - `POST /api/referral-codes/redeem`: structured success and failure bodies
//! - `PUT /api/referral-codes/{code}/active`: explicit toggle
//! - `GET /api/audit`: redemption events recorded

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{build_test_state, create_customer, create_outlet, create_test_db, send, store_code};

use pos_referral::endpoints::create_router;

#[tokio::test]
async fn test_generate_code_uses_customer_initials() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Front Desk").await;
    let customer = create_customer(&db, "annabel lee", Some("555-0100")).await;
    let app = create_router(build_test_state(db));

    let (status, body) = send(
        app,
        "POST",
        "/api/referral-codes",
        Some(json!({ "outlet_id": outlet.id, "customer_id": customer.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let code = body["code"].as_str().unwrap();
    assert!(code.starts_with("REF--ANN-"), "unexpected code {}", code);
    assert_eq!(code.len(), "REF--ANN-0000".len());
    assert_eq!(body["max_uses"], 1);
    assert_eq!(body["times_used"], 0);
    assert_eq!(body["phone_number"], "555-0100");
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_generate_code_unknown_customer() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Front Desk").await;
    let app = create_router(build_test_state(db));

    let (status, _) = send(
        app,
        "POST",
        "/api/referral-codes",
        Some(json!({ "outlet_id": outlet.id, "customer_id": 4242 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_code_reports_owner_and_validity() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Till 1").await;
    let customer = create_customer(&db, "Annabel Lee", None).await;
    store_code(&db, "REF-ANN-0427", outlet.id, customer.id, 1).await;
    let state = build_test_state(db);

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/pos_referral/check_code",
        Some(json!({ "code": "ref-ann-0427" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["message"], "Valid code");
    assert_eq!(body["customer_name"], "Annabel Lee");

    let (status, body) = send(
        create_router(state),
        "POST",
        "/pos_referral/check_code",
        Some(json!({ "code": "REF-MISSING-0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Referral code not found");
    assert!(body["customer_name"].is_null());
}

#[tokio::test]
async fn test_redeem_success_then_usage_limit() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Till 2").await;
    let customer = create_customer(&db, "Bo", None).await;
    store_code(&db, "REF-BO-0001", outlet.id, customer.id, 1).await;
    let state = build_test_state(db);

    let request = json!({ "code": "REF-BO-0001", "order_amount": 100.0, "outlet_id": outlet.id });

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/api/referral-codes/redeem",
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["discount_amount"], 10.0);
    assert!(body["redemption_id"].as_i64().is_some());

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/api/referral-codes/redeem",
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "USAGE_LIMIT_REACHED");
    assert_eq!(body["message"], "Referral code has reached maximum uses");

    let (status, body) = send(
        create_router(state.clone()),
        "POST",
        "/pos_referral/check_code",
        Some(json!({ "code": "REF-BO-0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Referral code has reached maximum uses");

    let (status, body) = send(
        create_router(state),
        "GET",
        "/api/audit?action=redemption_rejected",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["logs"][0]["error_message"], "USAGE_LIMIT_REACHED");
}

#[tokio::test]
async fn test_redeem_unknown_code_is_not_found() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Till 3").await;
    let app = create_router(build_test_state(db));

    let (status, body) = send(
        app,
        "POST",
        "/api/referral-codes/redeem",
        Some(json!({ "code": "NOPE", "order_amount": 100.0, "outlet_id": outlet.id })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "CODE_NOT_FOUND");
}

#[tokio::test]
async fn test_toggle_active_flag() {
    let db = create_test_db().await;
    let outlet = create_outlet(&db, "Till 4").await;
    let customer = create_customer(&db, "Cy", None).await;
    store_code(&db, "REF-CY-0001", outlet.id, customer.id, 3).await;
    let state = build_test_state(db);

    let (status, body) = send(
        create_router(state.clone()),
        "PUT",
        "/api/referral-codes/REF-CY-0001/active",
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (_, body) = send(
        create_router(state.clone()),
        "POST",
        "/pos_referral/check_code",
        Some(json!({ "code": "REF-CY-0001" })),
    )
    .await;
    assert_eq!(body["message"], "Referral code is not active");

    let (status, body) = send(
        create_router(state),
        "GET",
        "/api/referral-codes?is_active=false",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
