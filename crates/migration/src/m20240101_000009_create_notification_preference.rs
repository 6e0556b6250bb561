//! Create `notification_preference` table: opt-in/opt-out per donor.
//!
//! A missing row means the donor is opted in with defaults.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationPreference::Table)
                    .if_not_exists()
                    .col(string_len(NotificationPreference::DonorDocument, 32).primary_key())
                    .col(boolean(NotificationPreference::ReceiveNotifications).not_null())
                    .col(boolean(NotificationPreference::EmergenciesOnly).not_null())
                    .col(timestamp_with_time_zone(NotificationPreference::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_preference_donor")
                            .from(NotificationPreference::Table, NotificationPreference::DonorDocument)
                            .to(Donor::Table, Donor::Document)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(NotificationPreference::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum NotificationPreference { Table, DonorDocument, ReceiveNotifications, EmergenciesOnly, UpdatedAt }

#[derive(DeriveIden)]
enum Donor { Table, Document }
