use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{blood_type, errors, notification_preference, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donor")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub document: String,
    pub name: String,
    pub email: String,
    pub blood_type: Option<String>,
    pub user_id: Option<Uuid>,
    pub registered_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Preference,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Preference => Entity::has_one(notification_preference::Entity).into(),
        }
    }
}

impl Related<notification_preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Preference.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_document(document: &str) -> Result<(), errors::ModelError> {
    if document.trim().is_empty() {
        return Err(errors::ModelError::Validation("document required".into()));
    }
    if document.len() > 32 {
        return Err(errors::ModelError::Validation("document too long (<=32)".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    document: &str,
    name: &str,
    email: &str,
    user_id: Option<Uuid>,
) -> Result<Model, errors::ModelError> {
    validate_document(document)?;
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    let am = ActiveModel {
        document: Set(document.to_string()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        blood_type: Set(None),
        user_id: Set(user_id),
        registered_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            errors::ModelError::Conflict(format!("document already registered: {document}"))
        }
        _ => errors::ModelError::Db(e.to_string()),
    })
}

pub async fn find_by_document(
    db: &DatabaseConnection,
    document: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(document.to_string())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn set_blood_type(
    db: &DatabaseConnection,
    document: &str,
    blood: &str,
) -> Result<Model, errors::ModelError> {
    blood_type::validate(blood)?;
    let found = find_by_document(db, document)
        .await?
        .ok_or_else(|| errors::ModelError::NotFound(format!("donor {document}")))?;
    let mut am: ActiveModel = found.into();
    am.blood_type = Set(Some(blood.to_string()));
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Donors of the given blood type, with their notification preference row
/// (if any). The preference predicate is applied by the notify service.
pub async fn list_by_blood_type_with_preferences(
    db: &DatabaseConnection,
    blood: &str,
) -> Result<Vec<(Model, Option<notification_preference::Model>)>, errors::ModelError> {
    Entity::find()
        .filter(Column::BloodType.eq(blood))
        .find_also_related(notification_preference::Entity)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
