use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::referral_code;
use crate::services::ledger::CodeFilter;

/// Issue a new code for a customer, optionally tied to the order it came from
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct GenerateCodeRequest {
    pub outlet_id: i64,
    pub customer_id: i64,
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone_number: Option<String>,
    pub order_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReferralCodeResponse {
    pub id: i64,
    pub code: String,
    pub customer_id: i64,
    pub phone_number: Option<String>,
    pub order_id: Option<i64>,
    pub outlet_id: i64,
    pub max_uses: i32,
    pub times_used: i32,
    pub total_discount_given: f64,
    pub created_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<referral_code::Model> for ReferralCodeResponse {
    fn from(code: referral_code::Model) -> Self {
        Self {
            id: code.id,
            code: code.code,
            customer_id: code.customer_id,
            phone_number: code.phone_number,
            order_id: code.order_id,
            outlet_id: code.outlet_id,
            max_uses: code.max_uses,
            times_used: code.times_used,
            total_discount_given: code.total_discount_given,
            created_date: code.created_date,
            expiry_date: code.expiry_date,
            is_active: code.is_active,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReferralCodeQuery {
    pub outlet_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub is_active: Option<bool>,
}

impl From<ReferralCodeQuery> for CodeFilter {
    fn from(query: ReferralCodeQuery) -> Self {
        Self {
            outlet_id: query.outlet_id,
            customer_id: query.customer_id,
            is_active: query.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct RedeemRequest {
    #[validate(length(min = 1, message = "Referral code is required"))]
    pub code: String,
    #[validate(range(min = 0.0, message = "Order amount cannot be negative"))]
    pub order_amount: f64,
    pub outlet_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RedeemResponse {
    pub success: bool,
    /// Pass back as `redemption_id` when committing the order
    pub redemption_id: i64,
    pub code: String,
    pub discount_amount: f64,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CheckCodeRequest {
    pub code: String,
}

/// Answer to the till's "is this code usable?" question
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckCodeResponse {
    pub valid: bool,
    pub message: String,
    pub customer_name: Option<String>,
}
