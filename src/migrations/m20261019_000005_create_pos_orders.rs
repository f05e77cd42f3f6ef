//! Migration: Create pos_orders table

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
                    .table(PosOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PosOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PosOrders::OutletId).big_integer().not_null())
                    .col(ColumnDef::new(PosOrders::CustomerId).big_integer().null())
                    .col(
                        ColumnDef::new(PosOrders::AmountTotal)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PosOrders::ReferralCodeGenerated)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PosOrders::ReferralCodeId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PosOrders::UsedReferralCode).string().null())
                    .col(
                        ColumnDef::new(PosOrders::ReferralDiscount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PosOrders::ReferralRewardCreated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PosOrders::ReferralRewardAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PosOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PosOrders::Table, PosOrders::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PosOrders::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
#[iden = "pos_orders"]
pub enum PosOrders {
    Table,
    Id,
    #[iden = "outlet_id"]
    OutletId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "amount_total"]
    AmountTotal,
    #[iden = "referral_code_generated"]
    ReferralCodeGenerated,
    #[iden = "referral_code_id"]
    ReferralCodeId,
    #[iden = "used_referral_code"]
    UsedReferralCode,
    #[iden = "referral_discount"]
    ReferralDiscount,
    #[iden = "referral_reward_created"]
    ReferralRewardCreated,
    #[iden = "referral_reward_amount"]
    ReferralRewardAmount,
    #[iden = "created_at"]
    CreatedAt,
}
