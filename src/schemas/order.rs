use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{pos_order, referral_reward};

/// Checkout payload sent by the till when an order is finalised
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct CommitOrderRequest {
    pub outlet_id: i64,
    pub customer_id: Option<i64>,
    #[validate(range(min = 0.0, message = "Order total cannot be negative"))]
    pub amount_total: f64,
    pub referral_code_generated: Option<String>,
    pub referral_code_id: Option<i64>,
    /// Redemption returned by `POST /api/referral-codes/redeem`. The used code
    /// and discount are read from it.
    pub redemption_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub outlet_id: i64,
    pub customer_id: Option<i64>,
    pub amount_total: f64,
    pub referral_code_generated: Option<String>,
    pub referral_code_id: Option<i64>,
    pub used_referral_code: Option<String>,
    pub referral_discount: f64,
    pub referral_reward_created: bool,
    pub referral_reward_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl From<pos_order::Model> for OrderResponse {
    fn from(order: pos_order::Model) -> Self {
        Self {
            id: order.id,
            outlet_id: order.outlet_id,
            customer_id: order.customer_id,
            amount_total: order.amount_total,
            referral_code_generated: order.referral_code_generated,
            referral_code_id: order.referral_code_id,
            used_referral_code: order.used_referral_code,
            referral_discount: order.referral_discount,
            referral_reward_created: order.referral_reward_created,
            referral_reward_amount: order.referral_reward_amount,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RewardResponse {
    pub id: i64,
    pub order_id: i64,
    pub referral_code_id: i64,
    pub referrer_id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl From<referral_reward::Model> for RewardResponse {
    fn from(reward: referral_reward::Model) -> Self {
        Self {
            id: reward.id,
            order_id: reward.order_id,
            referral_code_id: reward.referral_code_id,
            referrer_id: reward.referrer_id,
            amount: reward.amount,
            created_at: reward.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CommitOrderResponse {
    pub order: OrderResponse,
    pub reward: Option<RewardResponse>,
}

/// Referral lines printed on a receipt. Absent fields are not printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReceiptReferral {
    pub order_id: i64,
    pub referral_code_generated: Option<String>,
    pub used_referral_code: Option<String>,
    pub referral_discount: Option<f64>,
    pub referral_reward_amount: Option<f64>,
}

impl From<&pos_order::Model> for ReceiptReferral {
    fn from(order: &pos_order::Model) -> Self {
        let positive = |v: f64| if v > 0.0 { Some(v) } else { None };
        Self {
            order_id: order.id,
            referral_code_generated: order.referral_code_generated.clone(),
            used_referral_code: order.used_referral_code.clone(),
            referral_discount: positive(order.referral_discount),
            referral_reward_amount: positive(order.referral_reward_amount),
        }
    }
}
