//! Migration: Create referral_redemptions table
//!
//! Each row is one accepted redemption. `order_id` stays null until an order
//! commit claims the row; the unique key keeps that claim one-to-one.

use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_outlets::Outlets;
use super::m20261019_000004_create_referral_codes::ReferralCodes;
use super::m20261019_000005_create_pos_orders::PosOrders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReferralRedemptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralRedemptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralRedemptions::ReferralCodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReferralRedemptions::Code).string().not_null())
                    .col(
                        ColumnDef::new(ReferralRedemptions::OutletId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralRedemptions::OrderAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralRedemptions::DiscountAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralRedemptions::OrderId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralRedemptions::RedeemedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRedemptions::Table, ReferralRedemptions::ReferralCodeId)
                            .to(ReferralCodes::Table, ReferralCodes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRedemptions::Table, ReferralRedemptions::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRedemptions::Table, ReferralRedemptions::OrderId)
                            .to(PosOrders::Table, PosOrders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referral_redemptions_code")
                    .table(ReferralRedemptions::Table)
                    .col(ReferralRedemptions::ReferralCodeId)
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
                    .table(ReferralRedemptions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "referral_redemptions"]
enum ReferralRedemptions {
    Table,
    Id,
    #[iden = "referral_code_id"]
    ReferralCodeId,
    Code,
    #[iden = "outlet_id"]
    OutletId,
    #[iden = "order_amount"]
    OrderAmount,
    #[iden = "discount_amount"]
    DiscountAmount,
    #[iden = "order_id"]
    OrderId,
    #[iden = "redeemed_at"]
    RedeemedAt,
}
