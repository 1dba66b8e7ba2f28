//! Migration: Create the clinics table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clinics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clinics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clinics::Name).string().not_null())
                    .col(
                        ColumnDef::new(Clinics::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Clinics::Address).string().null())
                    .col(ColumnDef::new(Clinics::Phone).string().null())
                    .col(ColumnDef::new(Clinics::Description).string().null())
                    .col(ColumnDef::new(Clinics::Image).string().null())
                    .col(ColumnDef::new(Clinics::OwnerId).uuid().null())
                    .col(ColumnDef::new(Clinics::LocationLat).double().null())
                    .col(ColumnDef::new(Clinics::LocationLng).double().null())
                    .col(
                        ColumnDef::new(Clinics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clinics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clinics_owner_id")
                    .table(Clinics::Table)
                    .col(Clinics::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clinics::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clinics {
    Table,
    Id,
    Name,
    Email,
    Address,
    Phone,
    Description,
    Image,
    OwnerId,
    LocationLat,
    LocationLng,
    CreatedAt,
    UpdatedAt,
}
