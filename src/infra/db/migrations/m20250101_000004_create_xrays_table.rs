//! Migration: Create the xrays table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Xrays::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Xrays::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Xrays::PatientUserId).uuid().not_null())
                    .col(ColumnDef::new(Xrays::Url).string().not_null())
                    .col(ColumnDef::new(Xrays::OriginalName).string().not_null())
                    .col(ColumnDef::new(Xrays::MimeType).string().not_null())
                    .col(ColumnDef::new(Xrays::Size).big_integer().not_null())
                    .col(
                        ColumnDef::new(Xrays::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_xrays_patient_user_id")
                    .table(Xrays::Table)
                    .col(Xrays::PatientUserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Xrays::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Xrays {
    Table,
    Id,
    PatientUserId,
    Url,
    OriginalName,
    MimeType,
    Size,
    CreatedAt,
}
