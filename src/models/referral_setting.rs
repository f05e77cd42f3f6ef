use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Validity window applied when an outlet stores 0 days
pub const DEFAULT_CODE_VALIDITY_DAYS: i32 = 365;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub outlet_id: i64,
    pub name: String,
    pub referral_enabled: bool,
    #[sea_orm(column_type = "Double")]
    pub referrer_percentage: f64,
    #[sea_orm(column_type = "Double")]
    pub referred_percentage: f64,
    pub referral_code_prefix: String,
    #[sea_orm(column_type = "Double")]
    pub min_order_amount: f64,
    pub max_uses_per_code: i32,
    pub code_validity_days: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Validity in days, with 0 meaning the default window
    pub fn effective_validity_days(&self) -> i64 {
        if self.code_validity_days <= 0 {
            DEFAULT_CODE_VALIDITY_DAYS as i64
        } else {
            self.code_validity_days as i64
        }
    }
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
