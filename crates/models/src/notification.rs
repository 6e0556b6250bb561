use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{blood_request, donor, errors};

/// Donor feed is capped; older notifications age out of view.
pub const FEED_LIMIT: u64 = 50;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_document: String,
    pub request_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
    pub read_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Donor,
    Request,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Donor => Entity::belongs_to(donor::Entity)
                .from(Column::DonorDocument)
                .to(donor::Column::Document)
                .into(),
            Relation::Request => Entity::belongs_to(blood_request::Entity)
                .from(Column::RequestId)
                .to(blood_request::Column::Id)
                .into(),
        }
    }
}

impl Related<blood_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(
    db: &DatabaseConnection,
    donor_document: &str,
    request_id: Option<Uuid>,
    kind: &str,
    title: &str,
    message: &str,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        donor_document: Set(donor_document.to_string()),
        request_id: Set(request_id),
        kind: Set(kind.to_string()),
        title: Set(title.to_string()),
        message: Set(message.to_string()),
        read: Set(false),
        created_at: Set(Utc::now().into()),
        read_at: Set(None),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Latest notifications for a donor, each with its originating request.
pub async fn list_for_donor_with_requests(
    db: &DatabaseConnection,
    document: &str,
) -> Result<Vec<(Model, Option<blood_request::Model>)>, errors::ModelError> {
    Entity::find()
        .filter(Column::DonorDocument.eq(document))
        .find_also_related(blood_request::Entity)
        .order_by_desc(Column::CreatedAt)
        .limit(FEED_LIMIT)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Mark read; scoped to the owning donor so one donor cannot touch another's rows.
pub async fn mark_read(
    db: &DatabaseConnection,
    id: Uuid,
    document: &str,
) -> Result<Model, errors::ModelError> {
    let found = Entity::find_by_id(id)
        .filter(Column::DonorDocument.eq(document))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::NotFound(format!("notification {id}")))?;
    let mut am: ActiveModel = found.into();
    am.read = Set(true);
    am.read_at = Set(Some(Utc::now().into()));
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
