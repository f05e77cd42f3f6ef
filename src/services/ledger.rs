//! Referral code ledger
//!
//! Issued codes are never deleted. They are switched off when their usage cap
//! is reached or when an admin toggles them.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::referral_code::{self, Column};
use crate::services::code_generator::CodeSource;
use crate::services::failure::ReferralFailure;

/// Everything about a new code except the code string itself
#[derive(Debug, Clone)]
pub struct NewReferralCode {
    pub customer_id: i64,
    pub phone_number: Option<String>,
    pub order_id: Option<i64>,
    pub outlet_id: i64,
    pub max_uses: i32,
    pub validity_days: i64,
}

/// Filters for listing codes
#[derive(Debug, Clone, Default)]
pub struct CodeFilter {
    pub outlet_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Persist a new code. A unique-key collision surfaces as `DUPLICATE_CODE`.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    code: &str,
    new: &NewReferralCode,
) -> Result<referral_code::Model> {
    if new.max_uses < 1 {
        return Err(AppError::BadRequest(
            "Maximum uses must be at least 1".to_string(),
        ));
    }

    let created_date = Utc::now();
    let expiry_date = created_date + Duration::days(new.validity_days.max(0));

    let model = referral_code::ActiveModel {
        code: Set(code.to_string()),
        customer_id: Set(new.customer_id),
        phone_number: Set(new.phone_number.clone()),
        order_id: Set(new.order_id),
        outlet_id: Set(new.outlet_id),
        max_uses: Set(new.max_uses),
        times_used: Set(0),
        total_discount_given: Set(0.0),
        created_date: Set(created_date),
        expiry_date: Set(Some(expiry_date)),
        is_active: Set(true),
        auto_deactivated: Set(false),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(record) => Ok(record),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(ReferralFailure::DuplicateCode.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Draw candidates from `source` and persist the first one the store accepts.
///
/// A candidate that passed the existence check can still lose the insert to a
/// concurrent generator; that attempt is dropped and the next one drawn. Every
/// proposal counts against the one `max_attempts` budget.
pub async fn issue<C, S>(
    db: &C,
    source: &mut S,
    new: &NewReferralCode,
    max_attempts: u32,
) -> Result<referral_code::Model>
where
    C: ConnectionTrait,
    S: CodeSource,
{
    for attempt in 1..=max_attempts.max(1) {
        let Some(code) = source.propose(db).await? else {
            continue;
        };

        match create(db, &code, new).await {
            Ok(record) => {
                tracing::info!(
                    "Issued referral code {} for customer {} at outlet {}",
                    record.code,
                    record.customer_id,
                    record.outlet_id
                );
                return Ok(record);
            }
            Err(AppError::Referral(ReferralFailure::DuplicateCode)) => {
                tracing::warn!("Referral code {} inserted concurrently (attempt {})", code, attempt);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(
        "Gave up issuing a referral code for customer {} after {} attempts",
        new.customer_id,
        max_attempts
    );
    Err(ReferralFailure::DuplicateCode.into())
}

pub async fn find_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<referral_code::Model>> {
    Ok(ReferralCode::find()
        .filter(Column::Code.eq(code.trim().to_uppercase()))
        .one(db)
        .await?)
}

pub async fn list<C: ConnectionTrait>(
    db: &C,
    filter: &CodeFilter,
) -> Result<Vec<referral_code::Model>> {
    let mut select = ReferralCode::find();

    if let Some(outlet_id) = filter.outlet_id {
        select = select.filter(Column::OutletId.eq(outlet_id));
    }
    if let Some(customer_id) = filter.customer_id {
        select = select.filter(Column::CustomerId.eq(customer_id));
    }
    if let Some(is_active) = filter.is_active {
        select = select.filter(Column::IsActive.eq(is_active));
    }

    Ok(select.order_by_desc(Column::CreatedDate).all(db).await?)
}

/// Check a code against its active flag, expiry and usage cap, in that order.
///
/// A code switched off by its own usage cap reports `USAGE_LIMIT_REACHED`
/// rather than `CODE_INACTIVE`.
pub fn is_valid(
    record: &referral_code::Model,
    now: DateTime<Utc>,
) -> std::result::Result<(), ReferralFailure> {
    if !record.is_active && !record.auto_deactivated {
        return Err(ReferralFailure::CodeInactive);
    }

    if let Some(expiry) = record.expiry_date {
        if expiry < now {
            return Err(ReferralFailure::CodeExpired);
        }
    }

    if record.is_exhausted() {
        return Err(ReferralFailure::UsageLimitReached);
    }

    if !record.is_active {
        return Err(ReferralFailure::CodeInactive);
    }

    Ok(())
}

/// Record one redemption of a code in its own transaction. See [`mark_used_in`].
pub async fn mark_used(
    db: &DbConn,
    code_id: i64,
    discount_amount: f64,
) -> Result<referral_code::Model> {
    let txn = db.begin().await?;
    match mark_used_in(&txn, code_id, discount_amount).await {
        Ok(record) => {
            txn.commit().await?;
            Ok(record)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

/// Record one redemption of a code on a caller-owned transaction.
///
/// The increment is a single conditional UPDATE guarded by `is_active` and
/// `times_used < max_uses`, so two redemptions racing past `is_valid` cannot
/// both succeed: the loser updates zero rows and gets `USAGE_LIMIT_REACHED`.
/// Reaching the cap deactivates the code in the same transaction.
pub async fn mark_used_in<C: ConnectionTrait>(
    txn: &C,
    code_id: i64,
    discount_amount: f64,
) -> Result<referral_code::Model> {
    let incremented = ReferralCode::update_many()
        .col_expr(Column::TimesUsed, Expr::col(Column::TimesUsed).add(1))
        .col_expr(
            Column::TotalDiscountGiven,
            Expr::col(Column::TotalDiscountGiven).add(discount_amount),
        )
        .filter(Column::Id.eq(code_id))
        .filter(Column::IsActive.eq(true))
        .filter(Expr::col(Column::TimesUsed).lt(Expr::col(Column::MaxUses)))
        .exec(txn)
        .await?;

    if incremented.rows_affected == 0 {
        tracing::debug!("Referral code {} lost a redemption race", code_id);
        return Err(ReferralFailure::UsageLimitReached.into());
    }

    ReferralCode::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::AutoDeactivated, Expr::value(true))
        .filter(Column::Id.eq(code_id))
        .filter(Expr::col(Column::TimesUsed).gte(Expr::col(Column::MaxUses)))
        .exec(txn)
        .await?;

    let record = ReferralCode::find_by_id(code_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Referral code {} not found", code_id)))?;

    if !record.is_active {
        tracing::info!(
            "Referral code {} reached its usage cap ({}) and was deactivated",
            record.code,
            record.max_uses
        );
    }

    Ok(record)
}

/// Explicitly switch a code on or off
pub async fn set_active<C: ConnectionTrait>(
    db: &C,
    code_id: i64,
    is_active: bool,
) -> Result<referral_code::Model> {
    let record = ReferralCode::find_by_id(code_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Referral code {} not found", code_id)))?;

    let mut model: referral_code::ActiveModel = record.into();
    model.is_active = Set(is_active);
    model.auto_deactivated = Set(false);

    Ok(model.update(db).await?)
}
