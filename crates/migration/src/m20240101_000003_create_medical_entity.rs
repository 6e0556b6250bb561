//! Create `medical_entity` table: blood banks and clinics.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicalEntity::Table)
                    .if_not_exists()
                    .col(uuid(MedicalEntity::Id).primary_key())
                    .col(string_len(MedicalEntity::Name, 255).not_null())
                    .col(string_len(MedicalEntity::Email, 255).not_null())
                    .col(ColumnDef::new(MedicalEntity::Location).string().null())
                    .col(ColumnDef::new(MedicalEntity::City).string_len(128).null())
                    .col(ColumnDef::new(MedicalEntity::Department).string_len(128).null())
                    .col(ColumnDef::new(MedicalEntity::UserId).uuid().null())
                    .col(timestamp_with_time_zone(MedicalEntity::RegisteredAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_entity_user")
                            .from(MedicalEntity::Table, MedicalEntity::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MedicalEntity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MedicalEntity { Table, Id, Name, Email, Location, City, Department, UserId, RegisteredAt }

#[derive(DeriveIden)]
enum User { Table, Id }
