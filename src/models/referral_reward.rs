use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reward credited to a referrer; at most one per order
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_rewards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_id: i64,
    pub referral_code_id: i64,
    pub referrer_id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pos_order::Entity",
        from = "Column::OrderId",
        to = "super::pos_order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::referral_code::Entity",
        from = "Column::ReferralCodeId",
        to = "super::referral_code::Column::Id"
    )]
    ReferralCode,
}

impl Related<super::pos_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::referral_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
