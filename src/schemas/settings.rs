use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::referral_setting;

/// Admin change to an outlet's referral settings. Omitted fields are kept.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateReferralSettings {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub referral_enabled: Option<bool>,
    #[validate(range(min = 0.0, message = "Referrer percentage cannot be negative"))]
    pub referrer_percentage: Option<f64>,
    #[validate(range(min = 0.0, message = "Referred percentage cannot be negative"))]
    pub referred_percentage: Option<f64>,
    #[validate(length(min = 1, max = 10, message = "Prefix must be between 1 and 10 characters"))]
    pub referral_code_prefix: Option<String>,
    #[validate(range(min = 0.0, message = "Minimum order amount cannot be negative"))]
    pub min_order_amount: Option<f64>,
    #[validate(range(min = 1, message = "Each code must allow at least one use"))]
    pub max_uses_per_code: Option<i32>,
    #[validate(range(min = 0, message = "Validity days cannot be negative"))]
    pub code_validity_days: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReferralSettingsResponse {
    pub id: i64,
    pub outlet_id: i64,
    pub name: String,
    pub referral_enabled: bool,
    pub referrer_percentage: f64,
    pub referred_percentage: f64,
    pub referral_code_prefix: String,
    pub min_order_amount: f64,
    pub max_uses_per_code: i32,
    pub code_validity_days: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<referral_setting::Model> for ReferralSettingsResponse {
    fn from(settings: referral_setting::Model) -> Self {
        Self {
            id: settings.id,
            outlet_id: settings.outlet_id,
            name: settings.name,
            referral_enabled: settings.referral_enabled,
            referrer_percentage: settings.referrer_percentage,
            referred_percentage: settings.referred_percentage,
            referral_code_prefix: settings.referral_code_prefix,
            min_order_amount: settings.min_order_amount,
            max_uses_per_code: settings.max_uses_per_code,
            code_validity_days: settings.code_validity_days,
            updated_at: settings.updated_at,
        }
    }
}
