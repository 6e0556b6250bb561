//! Create `donation` table: recorded blood draws.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donation::Table)
                    .if_not_exists()
                    .col(uuid(Donation::Id).primary_key())
                    .col(string_len(Donation::DonorDocument, 32).not_null())
                    .col(date(Donation::DonationDate).not_null())
                    .col(integer(Donation::AmountMl).not_null())
                    .col(ColumnDef::new(Donation::Center).string().null())
                    .col(ColumnDef::new(Donation::Observations).text().null())
                    .col(ColumnDef::new(Donation::Status).string_len(16).null())
                    .col(timestamp_with_time_zone(Donation::RecordedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donation_donor")
                            .from(Donation::Table, Donation::DonorDocument)
                            .to(Donor::Table, Donor::Document)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Donation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Donation { Table, Id, DonorDocument, DonationDate, AmountMl, Center, Observations, Status, RecordedAt }

#[derive(DeriveIden)]
enum Donor { Table, Document }
