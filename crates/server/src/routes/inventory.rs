use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::blood_inventory::{self, StockOp};

use crate::errors::ApiError;
use crate::routes::auth::{require_entity, AuthedUser, ServerState};

/// The entity's own stock, one row per blood type.
#[utoipa::path(get, path = "/api/inventory", tag = "inventory", responses((status = 200, description = "Inventory rows")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<blood_inventory::Model>>, ApiError> {
    let entity = require_entity(&state, &user).await?;
    let rows = blood_inventory::list_for_entity(&state.db, entity.id).await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct StockUpdate {
    pub op: StockOp,
    pub amount_ml: Option<i32>,
    pub units: Option<i32>,
}

/// Adjust one owned row. Rows belonging to another entity read as missing.
#[utoipa::path(patch, path = "/api/inventory/{id}", tag = "inventory", params(("id" = Uuid, Path, description = "Inventory row id")), responses((status = 200, description = "Updated row"), (status = 404, description = "Unknown row")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<StockUpdate>,
) -> Result<Json<blood_inventory::Model>, ApiError> {
    let entity = require_entity(&state, &user).await?;
    let row = blood_inventory::find_owned(&state.db, id, entity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("inventory row not found"))?;
    let updated = blood_inventory::apply_op(&state.db, row, body.op, body.amount_ml, body.units).await?;
    Ok(Json(updated))
}
