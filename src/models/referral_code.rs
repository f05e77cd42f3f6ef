use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub customer_id: i64,
    pub phone_number: Option<String>,
    /// Order the code was issued from, if any
    pub order_id: Option<i64>,
    pub outlet_id: i64,
    pub max_uses: i32,
    pub times_used: i32,
    #[sea_orm(column_type = "Double")]
    pub total_discount_given: f64,
    pub created_date: DateTimeUtc,
    pub expiry_date: Option<DateTimeUtc>,
    pub is_active: bool,
    /// Set when the usage cap switched the code off, as opposed to an explicit toggle
    pub auto_deactivated: bool,
}

impl Model {
    pub fn is_exhausted(&self) -> bool {
        self.times_used >= self.max_uses
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::outlet::Entity",
        from = "Column::OutletId",
        to = "super::outlet::Column::Id"
    )]
    Outlet,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::outlet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outlet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
