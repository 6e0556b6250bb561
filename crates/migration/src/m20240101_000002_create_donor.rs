//! Create `donor` table keyed by document number.
//!
//! The document is the natural key the rest of the schema references;
//! blood type stays null until the donor sets it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donor::Table)
                    .if_not_exists()
                    .col(string_len(Donor::Document, 32).primary_key())
                    .col(string_len(Donor::Name, 128).not_null())
                    .col(string_len(Donor::Email, 255).not_null())
                    .col(ColumnDef::new(Donor::BloodType).string_len(8).null())
                    .col(ColumnDef::new(Donor::UserId).uuid().null())
                    .col(timestamp_with_time_zone(Donor::RegisteredAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donor_user")
                            .from(Donor::Table, Donor::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Donor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Donor { Table, Document, Name, Email, BloodType, UserId, RegisteredAt }

#[derive(DeriveIden)]
enum User { Table, Id }
