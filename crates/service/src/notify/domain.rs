use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const KIND_REQUEST: &str = "request";
pub const KIND_EMERGENCY: &str = "emergency";

/// A donor's stored notification preference (business view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub receive_notifications: bool,
    pub emergencies_only: bool,
}

/// A donor eligible by blood type, before the preference predicate.
#[derive(Debug, Clone)]
pub struct CandidateDonor {
    pub document: String,
    pub name: String,
    pub preference: Option<Preference>,
}

/// The slice of a blood request the fan-out needs.
#[derive(Debug, Clone)]
pub struct FanoutRequest {
    pub id: Uuid,
    pub blood_type: String,
    pub amount_ml: i32,
    pub urgency: String,
    pub location: Option<String>,
    pub emergency: bool,
}

/// A notification row to be queued for one donor.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub donor_document: String,
    pub request_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub message: String,
}

/// Routine requests only reach donors above a certain urgency; emergencies
/// always fan out.
pub fn should_fan_out(urgency: &str, emergency: bool) -> bool {
    emergency
        || urgency == models::blood_request::URGENCY_HIGH
        || urgency == models::blood_request::URGENCY_CRITICAL
}

/// The preference predicate. No stored row means opted in with defaults.
/// Donors who only want emergencies still receive emergency fan-outs.
pub fn allows(preference: Option<&Preference>, emergency: bool) -> bool {
    match preference {
        None => true,
        Some(p) => p.receive_notifications && (emergency || !p.emergencies_only),
    }
}

/// Compose the notification for one matched donor.
pub fn compose(request: &FanoutRequest, donor_document: &str) -> NewNotification {
    let location_part = request
        .location
        .as_deref()
        .map(|l| format!(" Location: {l}."))
        .unwrap_or_default();
    let (kind, title, message) = if request.emergency {
        (
            KIND_EMERGENCY,
            "EMERGENCY: urgent blood request".to_string(),
            format!(
                "EMERGENCY: {}ml of {} blood needed immediately.{}",
                request.amount_ml, request.blood_type, location_part
            ),
        )
    } else {
        (
            KIND_REQUEST,
            format!("Blood request for type {}", request.blood_type),
            format!(
                "{}ml of {} blood needed.{} Urgency: {}.",
                request.amount_ml, request.blood_type, location_part, request.urgency
            ),
        )
    };
    NewNotification {
        donor_document: donor_document.to_string(),
        request_id: Some(request.id),
        kind: kind.to_string(),
        title,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pref(receive: bool, emergencies_only: bool) -> Preference {
        Preference { receive_notifications: receive, emergencies_only }
    }

    #[test]
    fn missing_preference_means_opted_in() {
        assert!(allows(None, false));
        assert!(allows(None, true));
    }

    #[test]
    fn opted_out_donors_never_match() {
        assert!(!allows(Some(&pref(false, false)), false));
        assert!(!allows(Some(&pref(false, true)), true));
    }

    #[test]
    fn emergencies_only_filters_routine_requests() {
        assert!(!allows(Some(&pref(true, true)), false));
        assert!(allows(Some(&pref(true, true)), true));
    }

    #[test]
    fn fan_out_gate_needs_urgency_or_emergency() {
        assert!(should_fan_out("High", false));
        assert!(should_fan_out("Critical", false));
        assert!(should_fan_out("Low", true));
        assert!(!should_fan_out("Low", false));
        assert!(!should_fan_out("Medium", false));
    }

    #[test]
    fn compose_emergency_sets_kind_and_title() {
        let req = FanoutRequest {
            id: uuid::Uuid::new_v4(),
            blood_type: "O-".into(),
            amount_ml: 450,
            urgency: "Critical".into(),
            location: Some("Ward 3".into()),
            emergency: true,
        };
        let n = compose(&req, "CC9");
        assert_eq!(n.kind, KIND_EMERGENCY);
        assert!(n.title.starts_with("EMERGENCY"));
        assert!(n.message.contains("450ml"));
        assert!(n.message.contains("Ward 3"));
    }

    #[test]
    fn compose_routine_mentions_urgency() {
        let req = FanoutRequest {
            id: uuid::Uuid::new_v4(),
            blood_type: "A+".into(),
            amount_ml: 300,
            urgency: "High".into(),
            location: None,
            emergency: false,
        };
        let n = compose(&req, "CC9");
        assert_eq!(n.kind, KIND_REQUEST);
        assert!(n.message.ends_with("Urgency: High."));
        assert!(!n.message.contains("Location"));
    }
}
