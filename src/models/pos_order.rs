use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A committed checkout, carrying the referral fields printed on receipts
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pos_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub outlet_id: i64,
    pub customer_id: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub amount_total: f64,
    pub referral_code_generated: Option<String>,
    pub referral_code_id: Option<i64>,
    pub used_referral_code: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub referral_discount: f64,
    pub referral_reward_created: bool,
    #[sea_orm(column_type = "Double")]
    pub referral_reward_amount: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::outlet::Entity",
        from = "Column::OutletId",
        to = "super::outlet::Column::Id"
    )]
    Outlet,
}

impl Related<super::outlet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outlet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
