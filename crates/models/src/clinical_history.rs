use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{donor, errors};

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_APPROVED: &str = "Approved";
pub const STATUS_REJECTED: &str = "Rejected";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clinical_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_document: String,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub diseases: Option<String>,
    pub medications: Option<String>,
    pub prior_transfusions: Option<bool>,
    pub personal_habits: Option<String>,
    pub observations: Option<String>,
    pub last_donation_date: Option<Date>,
    pub status: String,
    pub medical_notes: Option<String>,
    pub submitted_at: DateTimeWithTimeZone,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Donor,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Donor => Entity::belongs_to(donor::Entity)
                .from(Column::DonorDocument)
                .to(donor::Column::Document)
                .into(),
        }
    }
}

impl Related<donor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Questionnaire fields a donor submits; review fields are not settable here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Questionnaire {
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub diseases: Option<String>,
    pub medications: Option<String>,
    pub prior_transfusions: Option<bool>,
    pub personal_habits: Option<String>,
    pub observations: Option<String>,
    pub last_donation_date: Option<Date>,
}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    match status {
        STATUS_PENDING | STATUS_APPROVED | STATUS_REJECTED => Ok(()),
        other => Err(errors::ModelError::Validation(format!("invalid history status: {other}"))),
    }
}

/// One history per donor: resubmission overwrites the questionnaire and
/// resets the review state to `Pending`.
pub async fn upsert_for_donor(
    db: &DatabaseConnection,
    document: &str,
    q: Questionnaire,
) -> Result<Model, errors::ModelError> {
    let now = Utc::now().into();
    let existing = Entity::find()
        .filter(Column::DonorDocument.eq(document))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;

    let am = match existing {
        Some(model) => {
            let mut am: ActiveModel = model.into();
            am.age = Set(q.age);
            am.weight_kg = Set(q.weight_kg);
            am.height_cm = Set(q.height_cm);
            am.diseases = Set(q.diseases);
            am.medications = Set(q.medications);
            am.prior_transfusions = Set(q.prior_transfusions);
            am.personal_habits = Set(q.personal_habits);
            am.observations = Set(q.observations);
            am.last_donation_date = Set(q.last_donation_date);
            am.status = Set(STATUS_PENDING.to_string());
            am.medical_notes = Set(None);
            am.submitted_at = Set(now);
            am.reviewed_at = Set(None);
            return am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()));
        }
        None => ActiveModel {
            id: Set(Uuid::new_v4()),
            donor_document: Set(document.to_string()),
            age: Set(q.age),
            weight_kg: Set(q.weight_kg),
            height_cm: Set(q.height_cm),
            diseases: Set(q.diseases),
            medications: Set(q.medications),
            prior_transfusions: Set(q.prior_transfusions),
            personal_habits: Set(q.personal_habits),
            observations: Set(q.observations),
            last_donation_date: Set(q.last_donation_date),
            status: Set(STATUS_PENDING.to_string()),
            medical_notes: Set(None),
            submitted_at: Set(now),
            reviewed_at: Set(None),
        },
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_donor(
    db: &DatabaseConnection,
    document: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::DonorDocument.eq(document))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All histories with donor name/document, newest submission first.
pub async fn list_with_donors(
    db: &DatabaseConnection,
) -> Result<Vec<(Model, Option<donor::Model>)>, errors::ModelError> {
    Entity::find()
        .find_also_related(donor::Entity)
        .order_by_desc(Column::SubmittedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Entity review: set status and medical notes, stamp reviewed_at.
pub async fn review(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
    medical_notes: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_status(status)?;
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::NotFound(format!("clinical history {id}")))?;
    let mut am: ActiveModel = found.into();
    am.status = Set(status.to_string());
    am.medical_notes = Set(medical_notes);
    am.reviewed_at = Set(Some(Utc::now().into()));
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_are_closed_set() {
        assert!(validate_status(STATUS_PENDING).is_ok());
        assert!(validate_status(STATUS_APPROVED).is_ok());
        assert!(validate_status(STATUS_REJECTED).is_ok());
        assert!(validate_status("Maybe").is_err());
    }
}
