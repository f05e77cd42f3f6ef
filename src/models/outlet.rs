use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A point-of-sale location owning its own referral settings and codes
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "outlets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::referral_setting::Entity")]
    ReferralSettings,
    #[sea_orm(has_many = "super::referral_code::Entity")]
    ReferralCodes,
    #[sea_orm(has_many = "super::pos_order::Entity")]
    Orders,
}

impl Related<super::referral_setting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralSettings.def()
    }
}

impl Related<super::referral_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralCodes.def()
    }
}

impl Related<super::pos_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
