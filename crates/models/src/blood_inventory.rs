use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{blood_type, errors, medical_entity};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blood_inventory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity_id: Uuid,
    pub blood_type: String,
    pub amount_ml: i32,
    pub units: i32,
    pub center: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
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

impl Related<medical_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Stock adjustments an entity can apply to one of its rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockOp {
    /// Units received: add milliliters and units.
    Add,
    /// Units shipped out: subtract, clamped at zero.
    Dispatch,
    /// Manual correction: overwrite provided fields.
    Set,
}

pub async fn list_for_entity(
    db: &DatabaseConnection,
    entity_id: Uuid,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::EntityId.eq(entity_id))
        .order_by_asc(Column::BloodType)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_owned(
    db: &DatabaseConnection,
    id: Uuid,
    entity_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .filter(Column::EntityId.eq(entity_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Upsert on (entity, blood type): a recorded donation adds its volume and
/// one unit to the entity's stock.
pub async fn add_donation(
    db: &DatabaseConnection,
    entity_id: Uuid,
    blood: &str,
    amount_ml: i32,
    center: Option<String>,
) -> Result<Model, errors::ModelError> {
    blood_type::validate(blood)?;
    let now = Utc::now().into();
    let existing = Entity::find()
        .filter(Column::EntityId.eq(entity_id))
        .filter(Column::BloodType.eq(blood))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;

    match existing {
        Some(model) => {
            let mut am: ActiveModel = model.clone().into();
            am.amount_ml = Set(model.amount_ml + amount_ml);
            am.units = Set(model.units + 1);
            am.updated_at = Set(now);
            am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
        None => {
            let am = ActiveModel {
                id: Set(Uuid::new_v4()),
                entity_id: Set(entity_id),
                blood_type: Set(blood.to_string()),
                amount_ml: Set(amount_ml),
                units: Set(1),
                center: Set(center),
                updated_at: Set(now),
            };
            am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
        }
    }
}

/// Apply a stock operation to an existing row. Quantities never go below zero.
pub async fn apply_op(
    db: &DatabaseConnection,
    model: Model,
    op: StockOp,
    amount_ml: Option<i32>,
    units: Option<i32>,
) -> Result<Model, errors::ModelError> {
    let (new_ml, new_units) = compute_op(&op, model.amount_ml, model.units, amount_ml, units);
    let mut am: ActiveModel = model.into();
    am.amount_ml = Set(new_ml);
    am.units = Set(new_units);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

fn compute_op(
    op: &StockOp,
    current_ml: i32,
    current_units: i32,
    amount_ml: Option<i32>,
    units: Option<i32>,
) -> (i32, i32) {
    match op {
        StockOp::Add => (current_ml + amount_ml.unwrap_or(0), current_units + units.unwrap_or(1)),
        StockOp::Dispatch => (
            (current_ml - amount_ml.unwrap_or(0)).max(0),
            (current_units - units.unwrap_or(1)).max(0),
        ),
        StockOp::Set => (amount_ml.unwrap_or(current_ml), units.unwrap_or(current_units)),
    }
}

/// Cross-entity availability search for the blood-search screen.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub blood_type: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub min_amount_ml: Option<i32>,
    pub entity_id: Option<Uuid>,
}

/// Inventory rows with stock on hand, joined with their entity, filtered and
/// newest-updated first.
pub async fn search_with_entities(
    db: &DatabaseConnection,
    filter: SearchFilter,
) -> Result<Vec<(Model, Option<medical_entity::Model>)>, errors::ModelError> {
    let mut query = Entity::find()
        .find_also_related(medical_entity::Entity)
        .filter(Column::AmountMl.gt(0));
    if let Some(blood) = filter.blood_type {
        query = query.filter(Column::BloodType.eq(blood));
    }
    if let Some(city) = filter.city {
        query = query.filter(
            Expr::col((medical_entity::Entity, medical_entity::Column::City))
                .ilike(format!("%{city}%")),
        );
    }
    if let Some(department) = filter.department {
        query = query.filter(
            Expr::col((medical_entity::Entity, medical_entity::Column::Department))
                .ilike(format!("%{department}%")),
        );
    }
    if let Some(min) = filter.min_amount_ml {
        query = query.filter(Column::AmountMl.gte(min));
    }
    if let Some(entity_id) = filter.entity_id {
        query = query.filter(Column::EntityId.eq(entity_id));
    }
    query
        .order_by_desc(Column::UpdatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_defaults_to_one_unit() {
        assert_eq!(compute_op(&StockOp::Add, 1000, 2, Some(450), None), (1450, 3));
    }

    #[test]
    fn dispatch_clamps_at_zero() {
        assert_eq!(compute_op(&StockOp::Dispatch, 300, 1, Some(450), Some(2)), (0, 0));
    }

    #[test]
    fn set_keeps_missing_fields() {
        assert_eq!(compute_op(&StockOp::Set, 300, 1, None, Some(4)), (300, 4));
        assert_eq!(compute_op(&StockOp::Set, 300, 1, Some(900), None), (900, 1));
    }
}
