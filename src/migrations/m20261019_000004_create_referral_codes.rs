//! Migration: Create referral_codes table

use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_outlets::Outlets;
use super::m20261019_000002_create_customers::Customers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // The unique key is the final arbiter of code uniqueness
                    .col(
                        ColumnDef::new(ReferralCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::CustomerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReferralCodes::PhoneNumber).string().null())
                    .col(ColumnDef::new(ReferralCodes::OrderId).big_integer().null())
                    .col(
                        ColumnDef::new(ReferralCodes::OutletId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::MaxUses)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::TimesUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::TotalDiscountGiven)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::ExpiryDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ReferralCodes::AutoDeactivated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralCodes::Table, ReferralCodes::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralCodes::Table, ReferralCodes::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referral_codes_outlet")
                    .table(ReferralCodes::Table)
                    .col(ReferralCodes::OutletId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referral_codes_customer")
                    .table(ReferralCodes::Table)
                    .col(ReferralCodes::CustomerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ReferralCodes::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "referral_codes"]
pub enum ReferralCodes {
    Table,
    Id,
    Code,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "phone_number"]
    PhoneNumber,
    #[iden = "order_id"]
    OrderId,
    #[iden = "outlet_id"]
    OutletId,
    #[iden = "max_uses"]
    MaxUses,
    #[iden = "times_used"]
    TimesUsed,
    #[iden = "total_discount_given"]
    TotalDiscountGiven,
    #[iden = "created_date"]
    CreatedDate,
    #[iden = "expiry_date"]
    ExpiryDate,
    #[iden = "is_active"]
    IsActive,
    #[iden = "auto_deactivated"]
    AutoDeactivated,
}
