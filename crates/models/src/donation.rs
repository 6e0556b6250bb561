use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{donor, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_document: String,
    pub donation_date: Date,
    pub amount_ml: i32,
    pub center: Option<String>,
    pub observations: Option<String>,
    pub status: Option<String>,
    pub recorded_at: DateTimeWithTimeZone,
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

#[derive(Debug, Clone, Deserialize)]
pub struct NewDonation {
    pub donor_document: String,
    pub donation_date: NaiveDate,
    pub amount_ml: i32,
    pub center: Option<String>,
    pub observations: Option<String>,
}

/// Report filters; all optional, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct DonationFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub center: Option<String>,
    pub blood_type: Option<String>,
}

pub async fn create(db: &DatabaseConnection, input: NewDonation) -> Result<Model, errors::ModelError> {
    if input.amount_ml <= 0 {
        return Err(errors::ModelError::Validation("amount_ml must be positive".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        donor_document: Set(input.donor_document),
        donation_date: Set(input.donation_date),
        amount_ml: Set(input.amount_ml),
        center: Set(input.center),
        observations: Set(input.observations),
        status: Set(None),
        recorded_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_for_donor(
    db: &DatabaseConnection,
    document: &str,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::DonorDocument.eq(document))
        .order_by_desc(Column::DonationDate)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_with_donors(
    db: &DatabaseConnection,
) -> Result<Vec<(Model, Option<donor::Model>)>, errors::ModelError> {
    Entity::find()
        .find_also_related(donor::Entity)
        .order_by_desc(Column::DonationDate)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Filtered join for the donations report. The blood-type filter applies to
/// the donor, the rest to the donation itself.
pub async fn list_filtered_with_donors(
    db: &DatabaseConnection,
    filter: DonationFilter,
) -> Result<Vec<(Model, Option<donor::Model>)>, errors::ModelError> {
    let mut query = Entity::find().find_also_related(donor::Entity);
    if let Some(from) = filter.from {
        query = query.filter(Column::DonationDate.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(Column::DonationDate.lte(to));
    }
    if let Some(center) = filter.center {
        query = query.filter(Column::Center.eq(center));
    }
    if let Some(blood) = filter.blood_type {
        query = query.filter(donor::Column::BloodType.eq(blood));
    }
    query
        .order_by_desc(Column::DonationDate)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
