//! Migration: Create referral_settings table

use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_outlets::Outlets;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralSettings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // One settings row per outlet
                    .col(
                        ColumnDef::new(ReferralSettings::OutletId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ReferralSettings::Name).string().not_null())
                    .col(
                        ColumnDef::new(ReferralSettings::ReferralEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::ReferrerPercentage)
                            .double()
                            .not_null()
                            .default(15.0),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::ReferredPercentage)
                            .double()
                            .not_null()
                            .default(10.0),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::ReferralCodePrefix)
                            .string_len(10)
                            .not_null()
                            .default("REF-"),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::MinOrderAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::MaxUsesPerCode)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::CodeValidityDays)
                            .integer()
                            .not_null()
                            .default(365),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralSettings::Table, ReferralSettings::OutletId)
                            .to(Outlets::Table, Outlets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ReferralSettings::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "referral_settings"]
enum ReferralSettings {
    Table,
    Id,
    #[iden = "outlet_id"]
    OutletId,
    Name,
    #[iden = "referral_enabled"]
    ReferralEnabled,
    #[iden = "referrer_percentage"]
    ReferrerPercentage,
    #[iden = "referred_percentage"]
    ReferredPercentage,
    #[iden = "referral_code_prefix"]
    ReferralCodePrefix,
    #[iden = "min_order_amount"]
    MinOrderAmount,
    #[iden = "max_uses_per_code"]
    MaxUsesPerCode,
    #[iden = "code_validity_days"]
    CodeValidityDays,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
