use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Donor: fan-out matches on blood type
        manager
            .create_index(
                Index::create()
                    .name("idx_donor_blood_type")
                    .table(Donor::Table)
                    .col(Donor::BloodType)
                    .to_owned(),
            )
            .await?;

        // Donation: per-donor listing
        manager
            .create_index(
                Index::create()
                    .name("idx_donation_donor")
                    .table(Donation::Table)
                    .col(Donation::DonorDocument)
                    .to_owned(),
            )
            .await?;

        // BloodRequest: donor feed filters on blood type
        manager
            .create_index(
                Index::create()
                    .name("idx_blood_request_blood_type")
                    .table(BloodRequest::Table)
                    .col(BloodRequest::BloodType)
                    .to_owned(),
            )
            .await?;

        // BloodInventory: one row per entity per blood type
        manager
            .create_index(
                Index::create()
                    .name("uniq_inventory_entity_blood_type")
                    .table(BloodInventory::Table)
                    .col(BloodInventory::EntityId)
                    .col(BloodInventory::BloodType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Notification: donor feed sorted by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_donor_created")
                    .table(Notification::Table)
                    .col(Notification::DonorDocument)
                    .col(Notification::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_donor_blood_type").table(Donor::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_donation_donor").table(Donation::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_blood_request_blood_type").table(BloodRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_inventory_entity_blood_type").table(BloodInventory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_donor_created").table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Donor { Table, BloodType }

#[derive(DeriveIden)]
enum Donation { Table, DonorDocument }

#[derive(DeriveIden)]
enum BloodRequest { Table, BloodType }

#[derive(DeriveIden)]
enum BloodInventory { Table, EntityId, BloodType }

#[derive(DeriveIden)]
enum Notification { Table, DonorDocument, CreatedAt }
