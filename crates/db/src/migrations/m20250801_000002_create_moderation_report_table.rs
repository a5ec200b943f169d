//! Create moderation_report table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationReport::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModerationReport::ReporterId).string_len(32))
                    .col(
                        ColumnDef::new(ModerationReport::TargetType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::TargetId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::Reason)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::Severity)
                            .string_len(16)
                            .not_null()
                            .default("low"),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(ModerationReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on status for the admin queue listing
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_report_status")
                    .table(ModerationReport::Table)
                    .col(ModerationReport::Status)
                    .to_owned(),
            )
            .await?;

        // Index on created_at for newest-first pagination
        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_report_created_at")
                    .table(ModerationReport::Table)
                    .col(ModerationReport::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationReport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModerationReport {
    Table,
    Id,
    ReporterId,
    TargetType,
    TargetId,
    Reason,
    Severity,
    Status,
    CreatedAt,
}
