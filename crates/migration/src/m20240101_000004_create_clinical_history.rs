//! Create `clinical_history` table: one questionnaire per donor.
//!
//! Resubmission overwrites the row and resets the review state.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClinicalHistory::Table)
                    .if_not_exists()
                    .col(uuid(ClinicalHistory::Id).primary_key())
                    .col(string_len(ClinicalHistory::DonorDocument, 32).unique_key().not_null())
                    .col(ColumnDef::new(ClinicalHistory::Age).integer().null())
                    .col(ColumnDef::new(ClinicalHistory::WeightKg).double().null())
                    .col(ColumnDef::new(ClinicalHistory::HeightCm).double().null())
                    .col(ColumnDef::new(ClinicalHistory::Diseases).text().null())
                    .col(ColumnDef::new(ClinicalHistory::Medications).text().null())
                    .col(ColumnDef::new(ClinicalHistory::PriorTransfusions).boolean().null())
                    .col(ColumnDef::new(ClinicalHistory::PersonalHabits).text().null())
                    .col(ColumnDef::new(ClinicalHistory::Observations).text().null())
                    .col(ColumnDef::new(ClinicalHistory::LastDonationDate).date().null())
                    .col(string_len(ClinicalHistory::Status, 16).not_null())
                    .col(ColumnDef::new(ClinicalHistory::MedicalNotes).text().null())
                    .col(timestamp_with_time_zone(ClinicalHistory::SubmittedAt).not_null())
                    .col(ColumnDef::new(ClinicalHistory::ReviewedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clinical_history_donor")
                            .from(ClinicalHistory::Table, ClinicalHistory::DonorDocument)
                            .to(Donor::Table, Donor::Document)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClinicalHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClinicalHistory {
    Table,
    Id,
    DonorDocument,
    Age,
    WeightKg,
    HeightCm,
    Diseases,
    Medications,
    PriorTransfusions,
    PersonalHabits,
    Observations,
    LastDonationDate,
    Status,
    MedicalNotes,
    SubmittedAt,
    ReviewedAt,
}

#[derive(DeriveIden)]
enum Donor { Table, Document }
