use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{blood_type, errors, medical_entity};

pub const URGENCY_LOW: &str = "Low";
pub const URGENCY_MEDIUM: &str = "Medium";
pub const URGENCY_HIGH: &str = "High";
pub const URGENCY_CRITICAL: &str = "Critical";

/// Donors only ever see the few most recent matching requests.
pub const DONOR_FEED_LIMIT: u64 = 3;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blood_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_id: Uuid,
    pub blood_type: String,
    pub amount_ml: i32,
    pub urgency: String,
    pub required_date: Date,
    pub observations: Option<String>,
    pub emergency: bool,
    pub location: Option<String>,
    pub status: Option<String>,
    pub requested_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Entity,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Entity => Entity::belongs_to(medical_entity::Entity)
                .from(Column::EntityId)
                .to(medical_entity::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_urgency(urgency: &str) -> Result<(), errors::ModelError> {
    match urgency {
        URGENCY_LOW | URGENCY_MEDIUM | URGENCY_HIGH | URGENCY_CRITICAL => Ok(()),
        other => Err(errors::ModelError::Validation(format!("invalid urgency: {other}"))),
    }
}

#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    pub entity_id: Uuid,
    pub blood_type: String,
    pub amount_ml: i32,
    pub urgency: String,
    pub required_date: NaiveDate,
    pub observations: Option<String>,
    pub emergency: bool,
    pub location: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    input: NewBloodRequest,
) -> Result<Model, errors::ModelError> {
    blood_type::validate(&input.blood_type)?;
    validate_urgency(&input.urgency)?;
    if input.amount_ml <= 0 {
        return Err(errors::ModelError::Validation("amount_ml must be positive".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_id: Set(input.entity_id),
        blood_type: Set(input.blood_type),
        amount_ml: Set(input.amount_ml),
        urgency: Set(input.urgency),
        required_date: Set(input.required_date),
        observations: Set(input.observations),
        emergency: Set(input.emergency),
        location: Set(input.location),
        status: Set(None),
        requested_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_for_entity(
    db: &DatabaseConnection,
    entity_id: Uuid,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::EntityId.eq(entity_id))
        .order_by_desc(Column::RequestedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_for_blood_type(
    db: &DatabaseConnection,
    blood: &str,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::BloodType.eq(blood))
        .order_by_desc(Column::RequestedAt)
        .limit(DONOR_FEED_LIMIT)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_values_are_closed_set() {
        for u in [URGENCY_LOW, URGENCY_MEDIUM, URGENCY_HIGH, URGENCY_CRITICAL] {
            assert!(validate_urgency(u).is_ok());
        }
        assert!(validate_urgency("Urgent").is_err());
    }
}
