use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::referral_code::Entity")]
    ReferralCodes,
}

impl Related<super::referral_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
