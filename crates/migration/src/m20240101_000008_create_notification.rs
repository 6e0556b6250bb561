//! Create `notification` table: one row per matched donor per request.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(uuid(Notification::Id).primary_key())
                    .col(string_len(Notification::DonorDocument, 32).not_null())
                    .col(ColumnDef::new(Notification::RequestId).uuid().null())
                    .col(string_len(Notification::Kind, 16).not_null())
                    .col(string_len(Notification::Title, 255).not_null())
                    .col(text(Notification::Message).not_null())
                    .col(boolean(Notification::Read).not_null())
                    .col(timestamp_with_time_zone(Notification::CreatedAt).not_null())
                    .col(ColumnDef::new(Notification::ReadAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_donor")
                            .from(Notification::Table, Notification::DonorDocument)
                            .to(Donor::Table, Donor::Document)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_request")
                            .from(Notification::Table, Notification::RequestId)
                            .to(BloodRequest::Table, BloodRequest::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notification::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Notification { Table, Id, DonorDocument, RequestId, Kind, Title, Message, Read, CreatedAt, ReadAt }

#[derive(DeriveIden)]
enum Donor { Table, Document }

#[derive(DeriveIden)]
enum BloodRequest { Table, Id }
