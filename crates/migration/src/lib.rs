//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_donor;
mod m20240101_000003_create_medical_entity;
mod m20240101_000004_create_clinical_history;
mod m20240101_000005_create_donation;
mod m20240101_000006_create_blood_request;
mod m20240101_000007_create_blood_inventory;
mod m20240101_000008_create_notification;
mod m20240101_000009_create_notification_preference;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_donor::Migration),
            Box::new(m20240101_000003_create_medical_entity::Migration),
            Box::new(m20240101_000004_create_clinical_history::Migration),
            Box::new(m20240101_000005_create_donation::Migration),
            Box::new(m20240101_000006_create_blood_request::Migration),
            Box::new(m20240101_000007_create_blood_inventory::Migration),
            Box::new(m20240101_000008_create_notification::Migration),
            Box::new(m20240101_000009_create_notification_preference::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
