use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{allows, compose, should_fan_out, FanoutRequest};
use super::errors::NotifyError;
use super::repository::NotifyRepository;

/// Fan-out service independent of the web framework.
pub struct NotifyService<R: NotifyRepository> {
    repo: Arc<R>,
}

impl<R: NotifyRepository> NotifyService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Run the fan-out for a stored request and return how many donors were
    /// notified.
    ///
    /// Routine requests below `High` urgency do not fan out at all. Inserts
    /// are sequential and the first failure aborts the handler; there is no
    /// retry or partial-failure recovery.
    #[instrument(skip(self, request), fields(request_id = %request.id, blood_type = %request.blood_type, emergency = request.emergency))]
    pub async fn fan_out(&self, request: &FanoutRequest) -> Result<usize, NotifyError> {
        if !should_fan_out(&request.urgency, request.emergency) {
            debug!(urgency = %request.urgency, "fan-out skipped for routine request");
            return Ok(0);
        }

        let candidates = self.repo.list_candidates(&request.blood_type).await?;
        let mut notified = 0usize;
        for candidate in candidates {
            if !allows(candidate.preference.as_ref(), request.emergency) {
                continue;
            }
            self.repo
                .insert_notification(compose(request, &candidate.document))
                .await?;
            notified += 1;
        }

        info!(notified, "fan_out_complete");
        Ok(notified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::domain::{CandidateDonor, Preference, KIND_EMERGENCY, KIND_REQUEST};
    use crate::notify::repository::mock::MockNotifyRepository;
    use uuid::Uuid;

    fn candidate(document: &str, preference: Option<Preference>) -> CandidateDonor {
        CandidateDonor { document: document.into(), name: format!("Donor {document}"), preference }
    }

    fn request(blood_type: &str, urgency: &str, emergency: bool) -> FanoutRequest {
        FanoutRequest {
            id: Uuid::new_v4(),
            blood_type: blood_type.into(),
            amount_ml: 450,
            urgency: urgency.into(),
            location: Some("Main St 1".into()),
            emergency,
        }
    }

    fn pref(receive: bool, emergencies_only: bool) -> Preference {
        Preference { receive_notifications: receive, emergencies_only }
    }

    #[tokio::test]
    async fn routine_high_urgency_honors_preferences() {
        let repo = Arc::new(
            MockNotifyRepository::default()
                .with_donor("O+", candidate("CC1", None))
                .with_donor("O+", candidate("CC2", Some(pref(true, false))))
                .with_donor("O+", candidate("CC3", Some(pref(true, true))))
                .with_donor("O+", candidate("CC4", Some(pref(false, false))))
                .with_donor("A-", candidate("CC5", None)),
        );
        let svc = NotifyService::new(Arc::clone(&repo));

        let notified = svc.fan_out(&request("O+", "High", false)).await.unwrap();

        // opted-in default + explicit opt-in; emergencies-only and opted-out
        // donors excluded, other blood types never candidates
        assert_eq!(notified, 2);
        let inserted = repo.inserted();
        let documents: Vec<_> = inserted.iter().map(|n| n.donor_document.as_str()).collect();
        assert_eq!(documents, vec!["CC1", "CC2"]);
        assert!(inserted.iter().all(|n| n.kind == KIND_REQUEST));
    }

    #[tokio::test]
    async fn emergency_reaches_emergencies_only_donors() {
        let repo = Arc::new(
            MockNotifyRepository::default()
                .with_donor("AB-", candidate("CC1", Some(pref(true, true))))
                .with_donor("AB-", candidate("CC2", Some(pref(false, false)))),
        );
        let svc = NotifyService::new(Arc::clone(&repo));

        let notified = svc.fan_out(&request("AB-", "Critical", true)).await.unwrap();

        assert_eq!(notified, 1);
        let inserted = repo.inserted();
        assert_eq!(inserted[0].donor_document, "CC1");
        assert_eq!(inserted[0].kind, KIND_EMERGENCY);
    }

    #[tokio::test]
    async fn routine_low_urgency_skips_fan_out() {
        let repo = Arc::new(
            MockNotifyRepository::default().with_donor("B+", candidate("CC1", None)),
        );
        let svc = NotifyService::new(Arc::clone(&repo));

        let notified = svc.fan_out(&request("B+", "Medium", false)).await.unwrap();

        assert_eq!(notified, 0);
        assert!(repo.inserted().is_empty());
    }

    #[tokio::test]
    async fn each_match_gets_its_own_row() {
        let mut repo = MockNotifyRepository::default();
        for i in 0..5 {
            repo = repo.with_donor("O-", candidate(&format!("CC{i}"), None));
        }
        let repo = Arc::new(repo);
        let svc = NotifyService::new(Arc::clone(&repo));

        let req = request("O-", "Critical", true);
        let notified = svc.fan_out(&req).await.unwrap();

        assert_eq!(notified, 5);
        let inserted = repo.inserted();
        assert_eq!(inserted.len(), 5);
        assert!(inserted.iter().all(|n| n.request_id == Some(req.id)));
    }
}
