use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::blood_inventory::{self, SearchFilter};

use crate::errors::ApiError;
use crate::routes::auth::{require_entity, AuthedUser, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub blood_type: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub min_amount_ml: Option<i32>,
    pub entity_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct AvailabilityRow {
    #[serde(flatten)]
    pub stock: blood_inventory::Model,
    pub entity_name: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResult {
    pub total: usize,
    pub results: Vec<AvailabilityRow>,
}

/// Cross-entity availability: where stock of a blood type can be found.
/// City and department match case-insensitively on substrings.
#[utoipa::path(get, path = "/api/blood-search", tag = "search", responses((status = 200, description = "Availability rows"), (status = 403, description = "Not an entity")))]
pub async fn search(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    require_entity(&state, &user).await?;
    if let Some(blood) = q.blood_type.as_deref() {
        models::blood_type::validate(blood)?;
    }
    let rows = blood_inventory::search_with_entities(
        &state.db,
        SearchFilter {
            blood_type: q.blood_type,
            city: q.city,
            department: q.department,
            min_amount_ml: q.min_amount_ml,
            entity_id: q.entity_id,
        },
    )
    .await?;
    let results: Vec<AvailabilityRow> = rows
        .into_iter()
        .map(|(stock, entity)| {
            let (name, city, department, location) = match entity {
                Some(e) => (Some(e.name), e.city, e.department, e.location),
                None => (None, None, None, None),
            };
            AvailabilityRow { stock, entity_name: name, city, department, location }
        })
        .collect();
    Ok(Json(SearchResult { total: results.len(), results }))
}
