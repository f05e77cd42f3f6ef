//! Migration: Create referral_rewards table

use sea_orm_migration::prelude::*;

use super::m20261019_000002_create_customers::Customers;
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
                    .table(ReferralRewards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReferralRewards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralRewards::OrderId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ReferralRewards::ReferralCodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReferralRewards::ReferrerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReferralRewards::Amount).double().not_null())
                    .col(
                        ColumnDef::new(ReferralRewards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRewards::Table, ReferralRewards::OrderId)
                            .to(PosOrders::Table, PosOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRewards::Table, ReferralRewards::ReferralCodeId)
                            .to(ReferralCodes::Table, ReferralCodes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReferralRewards::Table, ReferralRewards::ReferrerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_referral_rewards_referrer")
                    .table(ReferralRewards::Table)
                    .col(ReferralRewards::ReferrerId)
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
                    .table(ReferralRewards::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "referral_rewards"]
enum ReferralRewards {
    Table,
    Id,
    #[iden = "order_id"]
    OrderId,
    #[iden = "referral_code_id"]
    ReferralCodeId,
    #[iden = "referrer_id"]
    ReferrerId,
    Amount,
    #[iden = "created_at"]
    CreatedAt,
}
