use async_trait::async_trait;

use super::domain::{CandidateDonor, NewNotification};
use super::errors::NotifyError;

/// Persistence abstraction for the fan-out: candidate selection by blood
/// type, and the per-donor notification insert.
#[async_trait]
pub trait NotifyRepository: Send + Sync {
    async fn list_candidates(&self, blood_type: &str) -> Result<Vec<CandidateDonor>, NotifyError>;
    async fn insert_notification(&self, notification: NewNotification) -> Result<(), NotifyError>;
}

/// In-memory mock keyed by blood type, recording every insert.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockNotifyRepository {
        donors: Mutex<HashMap<String, Vec<CandidateDonor>>>,
        inserted: Mutex<Vec<NewNotification>>,
    }

    impl MockNotifyRepository {
        pub fn with_donor(self, blood_type: &str, donor: CandidateDonor) -> Self {
            self.donors.lock().unwrap().entry(blood_type.to_string()).or_default().push(donor);
            self
        }

        pub fn inserted(&self) -> Vec<NewNotification> {
            self.inserted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotifyRepository for MockNotifyRepository {
        async fn list_candidates(&self, blood_type: &str) -> Result<Vec<CandidateDonor>, NotifyError> {
            Ok(self.donors.lock().unwrap().get(blood_type).cloned().unwrap_or_default())
        }

        async fn insert_notification(&self, notification: NewNotification) -> Result<(), NotifyError> {
            self.inserted.lock().unwrap().push(notification);
            Ok(())
        }
    }
}
