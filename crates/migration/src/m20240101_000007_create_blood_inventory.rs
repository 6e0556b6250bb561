//! Create `blood_inventory` table: per-entity, per-blood-type running totals.
//!
//! The (entity_id, blood_type) unique index is added in the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BloodInventory::Table)
                    .if_not_exists()
                    .col(uuid(BloodInventory::Id).primary_key())
                    .col(uuid(BloodInventory::EntityId).not_null())
                    .col(string_len(BloodInventory::BloodType, 8).not_null())
                    .col(integer(BloodInventory::AmountMl).not_null())
                    .col(integer(BloodInventory::Units).not_null())
                    .col(ColumnDef::new(BloodInventory::Center).string().null())
                    .col(timestamp_with_time_zone(BloodInventory::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blood_inventory_entity")
                            .from(BloodInventory::Table, BloodInventory::EntityId)
                            .to(MedicalEntity::Table, MedicalEntity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BloodInventory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BloodInventory { Table, Id, EntityId, BloodType, AmountMl, Units, Center, UpdatedAt }

#[derive(DeriveIden)]
enum MedicalEntity { Table, Id }
