//! Migration: Create audit_logs table
//!
//! The trail is read per outlet, per action or per resource type, newest
//! first, so each filter column gets an index ending in `timestamp`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Index name and its leading filter column
const FILTER_INDEXES: [(&str, AuditLogs); 3] = [
    ("idx_audit_logs_outlet_timestamp", AuditLogs::OutletId),
    ("idx_audit_logs_action_timestamp", AuditLogs::Action),
    ("idx_audit_logs_resource_type_timestamp", AuditLogs::ResourceType),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(AuditLogs::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(AuditLogs::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(AuditLogs::Timestamp)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(AuditLogs::OutletId).big_integer().null())
            .col(ColumnDef::new(AuditLogs::Action).string().not_null())
            .col(ColumnDef::new(AuditLogs::ResourceType).string().not_null())
            .col(ColumnDef::new(AuditLogs::ResourceId).string().null())
            .col(ColumnDef::new(AuditLogs::Details).string().null())
            .col(
                ColumnDef::new(AuditLogs::Success)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(AuditLogs::ErrorMessage).string().null());
        manager.create_table(table).await?;

        for (name, column) in FILTER_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(AuditLogs::Table)
                        .col(column)
                        .col(AuditLogs::Timestamp)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
#[iden = "audit_logs"]
enum AuditLogs {
    Table,
    Id,
    Timestamp,
    #[iden = "outlet_id"]
    OutletId,
    Action,
    #[iden = "resource_type"]
    ResourceType,
    #[iden = "resource_id"]
    ResourceId,
    Details,
    Success,
    #[iden = "error_message"]
    ErrorMessage,
}
