//! Migration: Create the patient_records table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PatientRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PatientRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PatientRecords::PatientId).uuid().not_null())
                    .col(ColumnDef::new(PatientRecords::ClinicId).uuid().not_null())
                    .col(ColumnDef::new(PatientRecords::Procedure).string().not_null())
                    .col(
                        ColumnDef::new(PatientRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patient_records_patient_id")
                    .table(PatientRecords::Table)
                    .col(PatientRecords::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PatientRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PatientRecords {
    Table,
    Id,
    PatientId,
    ClinicId,
    Procedure,
    CreatedAt,
}
