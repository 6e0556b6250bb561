//! Create `blood_request` table: an entity's ask for blood.
//!
//! Emergency requests get the highest urgency and trigger the widest fan-out.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BloodRequest::Table)
                    .if_not_exists()
                    .col(uuid(BloodRequest::Id).primary_key())
                    .col(uuid(BloodRequest::EntityId).not_null())
                    .col(string_len(BloodRequest::BloodType, 8).not_null())
                    .col(integer(BloodRequest::AmountMl).not_null())
                    .col(string_len(BloodRequest::Urgency, 16).not_null())
                    .col(date(BloodRequest::RequiredDate).not_null())
                    .col(ColumnDef::new(BloodRequest::Observations).text().null())
                    .col(boolean(BloodRequest::Emergency).not_null())
                    .col(ColumnDef::new(BloodRequest::Location).string().null())
                    .col(ColumnDef::new(BloodRequest::Status).string_len(16).null())
                    .col(timestamp_with_time_zone(BloodRequest::RequestedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blood_request_entity")
                            .from(BloodRequest::Table, BloodRequest::EntityId)
                            .to(MedicalEntity::Table, MedicalEntity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BloodRequest::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BloodRequest {
    Table,
    Id,
    EntityId,
    BloodType,
    AmountMl,
    Urgency,
    RequiredDate,
    Observations,
    Emergency,
    Location,
    Status,
    RequestedAt,
}

#[derive(DeriveIden)]
enum MedicalEntity { Table, Id }
