//! Per-outlet referral settings
//!
//! Settings are created on first access. `get_settings` is an explicit
//! get-or-create: a lookup by outlet, then an insert of defaults on miss.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr};

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::referral_setting::{self, DEFAULT_CODE_VALIDITY_DAYS};
use crate::schemas::UpdateReferralSettings;
use crate::services::failure::ReferralFailure;

pub const DEFAULT_REFERRER_PERCENTAGE: f64 = 15.0;
pub const DEFAULT_REFERRED_PERCENTAGE: f64 = 10.0;
pub const DEFAULT_CODE_PREFIX: &str = "REF-";
pub const DEFAULT_MIN_ORDER_AMOUNT: f64 = 0.0;
pub const DEFAULT_MAX_USES_PER_CODE: i32 = 1;

/// Fetch settings for an outlet, creating the default record on first access.
///
/// Fails with `NO_OUTLET_CONFIGURATION` when the outlet itself does not exist.
pub async fn get_settings<C: ConnectionTrait>(
    db: &C,
    outlet_id: i64,
) -> Result<referral_setting::Model> {
    Ok(ensure_settings(db, outlet_id).await?.0)
}

/// Like [`get_settings`], also reporting whether this call created the record
pub async fn ensure_settings<C: ConnectionTrait>(
    db: &C,
    outlet_id: i64,
) -> Result<(referral_setting::Model, bool)> {
    if let Some(settings) = find_settings(db, outlet_id).await? {
        return Ok((settings, false));
    }

    if Outlet::find_by_id(outlet_id).one(db).await?.is_none() {
        return Err(ReferralFailure::NoOutletConfiguration.into());
    }

    let now = Utc::now();
    let defaults = referral_setting::ActiveModel {
        outlet_id: Set(outlet_id),
        name: Set(format!("Referral Settings - {}", outlet_id)),
        referral_enabled: Set(true),
        referrer_percentage: Set(DEFAULT_REFERRER_PERCENTAGE),
        referred_percentage: Set(DEFAULT_REFERRED_PERCENTAGE),
        referral_code_prefix: Set(DEFAULT_CODE_PREFIX.to_string()),
        min_order_amount: Set(DEFAULT_MIN_ORDER_AMOUNT),
        max_uses_per_code: Set(DEFAULT_MAX_USES_PER_CODE),
        code_validity_days: Set(DEFAULT_CODE_VALIDITY_DAYS),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match defaults.insert(db).await {
        Ok(settings) => {
            tracing::info!("Created default referral settings for outlet {}", outlet_id);
            Ok((settings, true))
        }
        // Another request created the row between our lookup and insert
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let settings = find_settings(db, outlet_id).await?.ok_or_else(|| {
                AppError::Internal(format!(
                    "Referral settings for outlet {} vanished after conflict",
                    outlet_id
                ))
            })?;
            Ok((settings, false))
        }
        Err(e) => Err(e.into()),
    }
}

async fn find_settings<C: ConnectionTrait>(
    db: &C,
    outlet_id: i64,
) -> Result<Option<referral_setting::Model>> {
    Ok(ReferralSetting::find()
        .filter(referral_setting::Column::OutletId.eq(outlet_id))
        .one(db)
        .await?)
}

/// Apply an admin change to an outlet's settings. Fields left out are kept.
pub async fn update_settings<C: ConnectionTrait>(
    db: &C,
    outlet_id: i64,
    update: &UpdateReferralSettings,
) -> Result<referral_setting::Model> {
    let current = get_settings(db, outlet_id).await?;
    let mut model: referral_setting::ActiveModel = current.into();

    if let Some(name) = &update.name {
        model.name = Set(name.clone());
    }
    if let Some(enabled) = update.referral_enabled {
        model.referral_enabled = Set(enabled);
    }
    if let Some(pct) = update.referrer_percentage {
        model.referrer_percentage = Set(pct);
    }
    if let Some(pct) = update.referred_percentage {
        model.referred_percentage = Set(pct);
    }
    if let Some(prefix) = &update.referral_code_prefix {
        model.referral_code_prefix = Set(prefix.trim().to_string());
    }
    if let Some(amount) = update.min_order_amount {
        model.min_order_amount = Set(amount);
    }
    if let Some(max_uses) = update.max_uses_per_code {
        model.max_uses_per_code = Set(max_uses);
    }
    if let Some(days) = update.code_validity_days {
        model.code_validity_days = Set(days);
    }
    model.updated_at = Set(Utc::now());

    Ok(model.update(db).await?)
}
