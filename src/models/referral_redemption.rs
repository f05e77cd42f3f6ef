use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One successful use of a referral code. It is consumed by exactly one order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_redemptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub referral_code_id: i64,
    pub code: String,
    pub outlet_id: i64,
    #[sea_orm(column_type = "Double")]
    pub order_amount: f64,
    #[sea_orm(column_type = "Double")]
    pub discount_amount: f64,
    /// Set once, when an order commit claims this redemption
    #[sea_orm(unique)]
    pub order_id: Option<i64>,
    pub redeemed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::referral_code::Entity",
        from = "Column::ReferralCodeId",
        to = "super::referral_code::Column::Id"
    )]
    ReferralCode,
    #[sea_orm(
        belongs_to = "super::pos_order::Entity",
        from = "Column::OrderId",
        to = "super::pos_order::Column::Id"
    )]
    Order,
}

impl Related<super::referral_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralCode.def()
    }
}

impl Related<super::pos_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
