use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{donor, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_preference")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub donor_document: String,
    pub receive_notifications: bool,
    pub emergencies_only: bool,
    pub updated_at: DateTimeWithTimeZone,
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

pub async fn find_for_donor(
    db: &DatabaseConnection,
    document: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(document.to_string())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn upsert(
    db: &DatabaseConnection,
    document: &str,
    receive_notifications: bool,
    emergencies_only: bool,
) -> Result<Model, errors::ModelError> {
    let now = Utc::now().into();
    match find_for_donor(db, document).await? {
        Some(model) => {
            let mut am: ActiveModel = model.into();
            am.receive_notifications = Set(receive_notifications);
            am.emergencies_only = Set(emergencies_only);
            am.updated_at = Set(now);
            am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
        None => {
            let am = ActiveModel {
                donor_document: Set(document.to_string()),
                receive_notifications: Set(receive_notifications),
                emergencies_only: Set(emergencies_only),
                updated_at: Set(now),
            };
            am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
    }
}
