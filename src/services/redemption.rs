//! Applying a referral code to an order amount

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::Serialize;

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::referral_redemption;
use crate::services::failure::ReferralFailure;
use crate::services::{calculator, ledger, settings};

/// Result of a redemption attempt.
///
/// Validation refusals are values, not errors; only store failures come back
/// as `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RedemptionOutcome {
    Redeemed {
        /// Cited by the order commit that consumes this redemption
        redemption_id: i64,
        code_id: i64,
        code: String,
        referrer_id: i64,
        discount_amount: f64,
    },
    Rejected(ReferralFailure),
}

impl RedemptionOutcome {
    pub fn is_redeemed(&self) -> bool {
        matches!(self, RedemptionOutcome::Redeemed { .. })
    }

    pub fn failure(&self) -> Option<ReferralFailure> {
        match self {
            RedemptionOutcome::Rejected(failure) => Some(*failure),
            RedemptionOutcome::Redeemed { .. } => None,
        }
    }
}

/// Redeem `code` against an order of `order_amount` at `outlet_id`.
///
/// Settings are those of the redeeming outlet. Nothing is written unless every
/// check passes. The usage counter is bumped by a single conditional update and
/// the redemption row is written in the same transaction.
pub async fn redeem(
    db: &DbConn,
    code: &str,
    order_amount: f64,
    outlet_id: i64,
    now: DateTime<Utc>,
) -> Result<RedemptionOutcome> {
    match try_redeem(db, code, order_amount, outlet_id, now).await {
        Ok(outcome) => Ok(outcome),
        Err(AppError::Referral(failure)) => {
            tracing::warn!(
                "Referral code '{}' rejected at outlet {}: {}",
                code,
                outlet_id,
                failure.code()
            );
            Ok(RedemptionOutcome::Rejected(failure))
        }
        Err(e) => Err(e),
    }
}

async fn try_redeem(
    db: &DbConn,
    code: &str,
    order_amount: f64,
    outlet_id: i64,
    now: DateTime<Utc>,
) -> Result<RedemptionOutcome> {
    let settings = settings::get_settings(db, outlet_id).await?;
    if !settings.referral_enabled {
        return Err(ReferralFailure::FeatureDisabled.into());
    }

    if order_amount < settings.min_order_amount {
        return Err(ReferralFailure::BelowMinimumOrder.into());
    }

    let record = ledger::find_by_code(db, code)
        .await?
        .ok_or(ReferralFailure::CodeNotFound)?;

    ledger::is_valid(&record, now)?;

    let discount_amount = calculator::compute_discount(order_amount, settings.referred_percentage);

    let txn = db.begin().await?;
    let updated = match ledger::mark_used_in(&txn, record.id, discount_amount).await {
        Ok(updated) => updated,
        Err(e) => {
            txn.rollback().await?;
            return Err(e);
        }
    };
    let redemption = referral_redemption::ActiveModel {
        referral_code_id: Set(updated.id),
        code: Set(updated.code.clone()),
        outlet_id: Set(outlet_id),
        order_amount: Set(order_amount),
        discount_amount: Set(discount_amount),
        order_id: Set(None),
        redeemed_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        "Redeemed referral code {} at outlet {} for {:.2} ({}/{} uses)",
        updated.code,
        outlet_id,
        discount_amount,
        updated.times_used,
        updated.max_uses
    );

    Ok(RedemptionOutcome::Redeemed {
        redemption_id: redemption.id,
        code_id: updated.id,
        code: updated.code,
        referrer_id: updated.customer_id,
        discount_amount,
    })
}
