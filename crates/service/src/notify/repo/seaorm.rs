use sea_orm::DatabaseConnection;

use crate::notify::domain::{CandidateDonor, NewNotification, Preference};
use crate::notify::errors::NotifyError;
use crate::notify::repository::NotifyRepository;

pub struct SeaOrmNotifyRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl NotifyRepository for SeaOrmNotifyRepository {
    async fn list_candidates(&self, blood_type: &str) -> Result<Vec<CandidateDonor>, NotifyError> {
        let rows = models::donor::list_by_blood_type_with_preferences(&self.db, blood_type)
            .await
            .map_err(|e| NotifyError::Repository(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|(donor, preference)| CandidateDonor {
                document: donor.document,
                name: donor.name,
                preference: preference.map(|p| Preference {
                    receive_notifications: p.receive_notifications,
                    emergencies_only: p.emergencies_only,
                }),
            })
            .collect())
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<(), NotifyError> {
        models::notification::insert(
            &self.db,
            &notification.donor_document,
            notification.request_id,
            &notification.kind,
            &notification.title,
            &notification.message,
        )
        .await
        .map_err(|e| NotifyError::Repository(e.to_string()))?;
        Ok(())
    }
}
