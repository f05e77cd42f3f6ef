//! Order integration: code issuance at checkout, order commit, referrer rewards
//! and receipt fields.

use chrono::Utc;
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::{pos_order, referral_code, referral_redemption, referral_reward};
use crate::schemas::{CommitOrderRequest, ReceiptReferral};
use crate::services::code_generator::RandomCodes;
use crate::services::failure::ReferralFailure;
use crate::services::ledger::{self, NewReferralCode};
use crate::services::{calculator, settings};

/// Who a new code is for and where it was issued
#[derive(Debug, Clone)]
pub struct CodeRequest {
    pub outlet_id: i64,
    pub customer_id: i64,
    pub phone_number: Option<String>,
    pub order_id: Option<i64>,
}

/// A committed order and the reward it produced, if any
#[derive(Debug, Clone)]
pub struct CommittedOrder {
    pub order: pos_order::Model,
    pub reward: Option<referral_reward::Model>,
    /// The redemption was already claimed; `order` is the one that claimed it
    pub replayed: bool,
}

/// Reward bookkeeping performed for an order
#[derive(Debug, Clone, PartialEq)]
pub struct RewardGrant {
    pub amount: f64,
    /// Only written when the amount is positive
    pub reward: Option<referral_reward::Model>,
}

/// Issue a referral code for a customer using the outlet's settings.
///
/// When `order_id` is given, the order is stamped with the generated code
/// unless it already carries one.
pub async fn create_referral_code<R: Rng + Send>(
    db: &DbConn,
    request: &CodeRequest,
    rng: &mut R,
    max_attempts: u32,
) -> Result<referral_code::Model> {
    let settings = settings::get_settings(db, request.outlet_id).await?;
    if !settings.referral_enabled {
        return Err(ReferralFailure::FeatureDisabled.into());
    }

    let customer = Customer::find_by_id(request.customer_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Customer {} not found", request.customer_id))
        })?;

    if let Some(order_id) = request.order_id {
        find_order(db, order_id).await?;
    }

    let new = NewReferralCode {
        customer_id: customer.id,
        phone_number: request.phone_number.clone().or(customer.phone.clone()),
        order_id: request.order_id,
        outlet_id: request.outlet_id,
        max_uses: settings.max_uses_per_code,
        validity_days: settings.effective_validity_days(),
    };

    let mut source = RandomCodes::new(&settings.referral_code_prefix, Some(&customer.name), rng);
    let code = ledger::issue(db, &mut source, &new, max_attempts).await?;

    if let Some(order_id) = request.order_id {
        let stamped = PosOrder::update_many()
            .col_expr(
                pos_order::Column::ReferralCodeGenerated,
                Expr::value(code.code.clone()),
            )
            .col_expr(pos_order::Column::ReferralCodeId, Expr::value(code.id))
            .filter(pos_order::Column::Id.eq(order_id))
            .filter(pos_order::Column::ReferralCodeGenerated.is_null())
            .exec(db)
            .await?;

        if stamped.rows_affected == 0 {
            tracing::warn!(
                "Order {} already carries a generated referral code; {} not stamped",
                order_id,
                code.code
            );
        }
    }

    Ok(code)
}

/// Persist a finalised order, then credit the referrer when it consumed a
/// redemption.
///
/// The used code and its discount come from the cited redemption, never from
/// the till. A redemption backs one order: the claim is a conditional update
/// on `referral_redemptions.order_id`, and a commit that cites an already
/// claimed redemption returns the claiming order instead of a new one.
pub async fn commit_order(db: &DbConn, request: &CommitOrderRequest) -> Result<CommittedOrder> {
    if Outlet::find_by_id(request.outlet_id).one(db).await?.is_none() {
        return Err(ReferralFailure::NoOutletConfiguration.into());
    }

    let redemption = match request.redemption_id {
        Some(id) => Some(find_redemption(db, id).await?),
        None => None,
    };

    if let Some(redemption) = &redemption {
        if redemption.outlet_id != request.outlet_id {
            return Err(AppError::BadRequest(format!(
                "Redemption {} belongs to outlet {}",
                redemption.id, redemption.outlet_id
            )));
        }
        if let Some(order_id) = redemption.order_id {
            return replay(db, redemption.id, order_id).await;
        }
    }

    let txn = db.begin().await?;

    let order = pos_order::ActiveModel {
        outlet_id: Set(request.outlet_id),
        customer_id: Set(request.customer_id),
        amount_total: Set(request.amount_total),
        referral_code_generated: Set(request.referral_code_generated.clone()),
        referral_code_id: Set(request.referral_code_id),
        used_referral_code: Set(redemption.as_ref().map(|r| r.code.clone())),
        referral_discount: Set(redemption.as_ref().map_or(0.0, |r| r.discount_amount)),
        referral_reward_created: Set(false),
        referral_reward_amount: Set(0.0),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(redemption) = &redemption {
        let claimed = ReferralRedemption::update_many()
            .col_expr(referral_redemption::Column::OrderId, Expr::value(order.id))
            .filter(referral_redemption::Column::Id.eq(redemption.id))
            .filter(referral_redemption::Column::OrderId.is_null())
            .exec(&txn)
            .await?;

        if claimed.rows_affected == 0 {
            txn.rollback().await?;
            let winner = find_redemption(db, redemption.id).await?;
            let order_id = winner.order_id.ok_or_else(|| {
                AppError::Internal(format!("Redemption {} lost its order", redemption.id))
            })?;
            return replay(db, redemption.id, order_id).await;
        }
    }

    txn.commit().await?;

    tracing::info!(
        "Committed order {} at outlet {} for {:.2}",
        order.id,
        order.outlet_id,
        order.amount_total
    );

    settle(db, order, false).await
}

async fn replay(db: &DbConn, redemption_id: i64, order_id: i64) -> Result<CommittedOrder> {
    tracing::info!(
        "Redemption {} already committed as order {}",
        redemption_id,
        order_id
    );
    let order = find_order(db, order_id).await?;
    settle(db, order, true).await
}

/// Create the reward if still owed and return the order as stored afterwards
async fn settle(db: &DbConn, order: pos_order::Model, replayed: bool) -> Result<CommittedOrder> {
    match create_reward_for_referrer(db, order.id).await? {
        Some(grant) => Ok(CommittedOrder {
            order: find_order(db, order.id).await?,
            reward: grant.reward,
            replayed,
        }),
        None => Ok(CommittedOrder {
            order,
            reward: None,
            replayed,
        }),
    }
}

/// Credit the referrer for the redemption an order consumed, at most once per
/// order.
///
/// Returns `None` when the order consumed no redemption or its reward was
/// already created. The claim on the order's `referral_reward_created` flag is
/// a conditional update, so concurrent calls cannot both grant.
pub async fn create_reward_for_referrer(
    db: &DbConn,
    order_id: i64,
) -> Result<Option<RewardGrant>> {
    let order = find_order(db, order_id).await?;

    if order.referral_reward_created {
        tracing::debug!("Reward for order {} already created", order_id);
        return Ok(None);
    }

    let Some(redemption) = ReferralRedemption::find()
        .filter(referral_redemption::Column::OrderId.eq(order_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let code = ReferralCode::find_by_id(redemption.referral_code_id)
        .one(db)
        .await?
        .ok_or(ReferralFailure::CodeNotFound)?;
    let settings = settings::get_settings(db, order.outlet_id).await?;

    let amount = calculator::compute_reward(
        redemption.discount_amount,
        settings.referrer_percentage,
        settings.referred_percentage,
    );

    let txn = db.begin().await?;

    let claimed = PosOrder::update_many()
        .col_expr(pos_order::Column::ReferralRewardCreated, Expr::value(true))
        .col_expr(pos_order::Column::ReferralRewardAmount, Expr::value(amount))
        .filter(pos_order::Column::Id.eq(order_id))
        .filter(pos_order::Column::ReferralRewardCreated.eq(false))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(None);
    }

    let reward = if amount > 0.0 {
        let reward = referral_reward::ActiveModel {
            order_id: Set(order_id),
            referral_code_id: Set(code.id),
            referrer_id: Set(code.customer_id),
            amount: Set(amount),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        Some(reward)
    } else {
        None
    };

    txn.commit().await?;

    tracing::info!(
        "Referrer {} credited {:.2} for order {} (code {})",
        code.customer_id,
        amount,
        order_id,
        code.code
    );

    Ok(Some(RewardGrant { amount, reward }))
}

/// Referral fields for printing on an order's receipt
pub async fn receipt(db: &DbConn, order_id: i64) -> Result<ReceiptReferral> {
    let order = find_order(db, order_id).await?;
    Ok(ReceiptReferral::from(&order))
}

async fn find_order<C: ConnectionTrait>(db: &C, order_id: i64) -> Result<pos_order::Model> {
    PosOrder::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))
}

async fn find_redemption<C: ConnectionTrait>(
    db: &C,
    redemption_id: i64,
) -> Result<referral_redemption::Model> {
    ReferralRedemption::find_by_id(redemption_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Redemption {} not found", redemption_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::UpdateReferralSettings;
    use crate::services::redemption::{self, RedemptionOutcome};
    use crate::test_helpers::{create_test_customer, create_test_db, create_test_outlet};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn commit_request(outlet_id: i64, redemption_id: Option<i64>) -> CommitOrderRequest {
        CommitOrderRequest {
            outlet_id,
            amount_total: 200.0,
            redemption_id,
            ..Default::default()
        }
    }

    async fn issue_for(
        db: &DbConn,
        outlet_id: i64,
        customer_id: i64,
        seed: u64,
    ) -> referral_code::Model {
        let mut rng = StdRng::seed_from_u64(seed);
        let request = CodeRequest {
            outlet_id,
            customer_id,
            phone_number: None,
            order_id: None,
        };
        create_referral_code(db, &request, &mut rng, 10).await.unwrap()
    }

    async fn redeem_at(db: &DbConn, code: &str, outlet_id: i64) -> i64 {
        match redemption::redeem(db, code, 200.0, outlet_id, Utc::now()).await.unwrap() {
            RedemptionOutcome::Redeemed { redemption_id, .. } => redemption_id,
            rejected => panic!("redemption rejected: {:?}", rejected),
        }
    }

    #[tokio::test]
    async fn test_create_referral_code_uses_outlet_settings() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Quay").await;
        let customer = create_test_customer(&db, "Annabel Lee").await;
        settings::update_settings(
            &db,
            outlet.id,
            &UpdateReferralSettings {
                referral_code_prefix: Some("QY".to_string()),
                max_uses_per_code: Some(3),
                code_validity_days: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let order = commit_order(&db, &commit_request(outlet.id, None))
            .await
            .unwrap()
            .order;

        let mut rng = StdRng::seed_from_u64(1);
        let request = CodeRequest {
            outlet_id: outlet.id,
            customer_id: customer.id,
            phone_number: None,
            order_id: Some(order.id),
        };
        let code = create_referral_code(&db, &request, &mut rng, 10).await.unwrap();

        assert!(code.code.starts_with("QY-ANN-"));
        assert_eq!(code.max_uses, 3);
        assert_eq!(code.order_id, Some(order.id));
        let expiry = code.expiry_date.unwrap();
        assert_eq!((expiry - code.created_date).num_days(), 365);

        let stamped = find_order(&db, order.id).await.unwrap();
        assert_eq!(stamped.referral_code_generated.as_deref(), Some(code.code.as_str()));
        assert_eq!(stamped.referral_code_id, Some(code.id));

        // A second code does not overwrite the order's stamp
        let again = create_referral_code(&db, &request, &mut rng, 10).await.unwrap();
        let unchanged = find_order(&db, order.id).await.unwrap();
        assert_ne!(again.code, code.code);
        assert_eq!(unchanged.referral_code_generated.as_deref(), Some(code.code.as_str()));
    }

    #[tokio::test]
    async fn test_create_referral_code_when_disabled() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Closed").await;
        let customer = create_test_customer(&db, "Bo").await;
        settings::update_settings(
            &db,
            outlet.id,
            &UpdateReferralSettings {
                referral_enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let request = CodeRequest {
            outlet_id: outlet.id,
            customer_id: customer.id,
            phone_number: None,
            order_id: None,
        };
        let mut rng = StdRng::seed_from_u64(2);
        let err = create_referral_code(&db, &request, &mut rng, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Referral(ReferralFailure::FeatureDisabled)
        ));
        assert!(ReferralCode::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reward_created_once_per_order() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Rewards").await;
        let referrer = create_test_customer(&db, "Annabel").await;
        let code = issue_for(&db, outlet.id, referrer.id, 3).await;
        let redemption_id = redeem_at(&db, &code.code, outlet.id).await;

        let committed = commit_order(&db, &commit_request(outlet.id, Some(redemption_id)))
            .await
            .unwrap();
        assert!(!committed.replayed);
        assert_eq!(committed.order.used_referral_code.as_deref(), Some(code.code.as_str()));
        assert_eq!(committed.order.referral_discount, 20.0);
        assert!(committed.order.referral_reward_created);
        assert_eq!(committed.order.referral_reward_amount, 30.0);
        let reward = committed.reward.unwrap();
        assert_eq!(reward.amount, 30.0);
        assert_eq!(reward.referrer_id, referrer.id);

        assert_eq!(
            create_reward_for_referrer(&db, committed.order.id).await.unwrap(),
            None
        );
        assert_eq!(ReferralReward::find().all(&db).await.unwrap().len(), 1);

        let claimed = find_redemption(&db, redemption_id).await.unwrap();
        assert_eq!(claimed.order_id, Some(committed.order.id));
    }

    #[tokio::test]
    async fn test_retried_commit_returns_original_order() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Retries").await;
        let referrer = create_test_customer(&db, "Annabel").await;
        let code = issue_for(&db, outlet.id, referrer.id, 5).await;
        let redemption_id = redeem_at(&db, &code.code, outlet.id).await;
        let request = commit_request(outlet.id, Some(redemption_id));

        let first = commit_order(&db, &request).await.unwrap();
        let second = commit_order(&db, &request).await.unwrap();
        let third = commit_order(&db, &request).await.unwrap();

        assert!(first.reward.is_some());
        for retry in [&second, &third] {
            assert!(retry.replayed);
            assert_eq!(retry.order.id, first.order.id);
            assert!(retry.reward.is_none());
        }
        assert_eq!(PosOrder::find().all(&db).await.unwrap().len(), 1);
        assert_eq!(ReferralReward::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_without_redemption_earns_no_reward() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Plain").await;
        let referrer = create_test_customer(&db, "Annabel").await;
        issue_for(&db, outlet.id, referrer.id, 6).await;

        let committed = commit_order(&db, &commit_request(outlet.id, None))
            .await
            .unwrap();
        assert!(committed.reward.is_none());
        assert!(!committed.order.referral_reward_created);
        assert_eq!(committed.order.used_referral_code, None);
        assert_eq!(committed.order.referral_discount, 0.0);

        assert_eq!(
            create_reward_for_referrer(&db, committed.order.id).await.unwrap(),
            None
        );
        assert!(ReferralReward::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_rejects_unknown_or_foreign_redemption() {
        let db = create_test_db().await;
        let home = create_test_outlet(&db, "Home").await;
        let away = create_test_outlet(&db, "Away").await;
        let referrer = create_test_customer(&db, "Annabel").await;
        let code = issue_for(&db, home.id, referrer.id, 7).await;
        let redemption_id = redeem_at(&db, &code.code, home.id).await;

        assert!(matches!(
            commit_order(&db, &commit_request(home.id, Some(redemption_id + 100))).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            commit_order(&db, &commit_request(away.id, Some(redemption_id))).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(PosOrder::find().all(&db).await.unwrap().is_empty());
        let unclaimed = find_redemption(&db, redemption_id).await.unwrap();
        assert_eq!(unclaimed.order_id, None);
    }

    #[tokio::test]
    async fn test_zero_reward_sets_flag_without_row() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Zero").await;
        let referrer = create_test_customer(&db, "Cy").await;
        settings::update_settings(
            &db,
            outlet.id,
            &UpdateReferralSettings {
                referred_percentage: Some(0.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let code = issue_for(&db, outlet.id, referrer.id, 4).await;
        let redemption_id = redeem_at(&db, &code.code, outlet.id).await;

        let committed = commit_order(&db, &commit_request(outlet.id, Some(redemption_id)))
            .await
            .unwrap();
        assert!(committed.order.referral_reward_created);
        assert_eq!(committed.order.referral_reward_amount, 0.0);
        assert!(committed.reward.is_none());
        assert!(ReferralReward::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_unknown_outlet() {
        let db = create_test_db().await;
        let err = commit_order(&db, &commit_request(404, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Referral(ReferralFailure::NoOutletConfiguration)
        ));
    }

    #[tokio::test]
    async fn test_receipt_fields() {
        let db = create_test_db().await;
        let outlet = create_test_outlet(&db, "Receipts").await;

        let plain = commit_order(&db, &commit_request(outlet.id, None))
            .await
            .unwrap()
            .order;
        let lines = receipt(&db, plain.id).await.unwrap();
        assert_eq!(lines.used_referral_code, None);
        assert_eq!(lines.referral_discount, None);
        assert_eq!(lines.referral_code_generated, None);

        assert!(matches!(receipt(&db, 9999).await, Err(AppError::NotFound(_))));
    }
}
