use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, AuthedUser, ServerState};

/// Public projection of a donor row. Email, user id and timestamps stay
/// private to the owner.
#[derive(Serialize)]
pub struct DonorSummary {
    pub name: String,
    pub blood_type: Option<String>,
}

/// Donor lookup by document; any authenticated caller.
#[utoipa::path(get, path = "/api/donors/{document}", tag = "donors", params(("document" = String, Path, description = "Donor document number")), responses((status = 200, description = "Donor name and blood type"), (status = 404, description = "Unknown donor")))]
pub async fn get_donor(
    State(state): State<ServerState>,
    Path(document): Path<String>,
) -> Result<Json<DonorSummary>, ApiError> {
    let donor = models::donor::find_by_document(&state.db, &document)
        .await?
        .ok_or_else(|| ApiError::not_found("donor not found"))?;
    Ok(Json(DonorSummary { name: donor.name, blood_type: donor.blood_type }))
}

#[derive(Deserialize)]
pub struct BloodTypeUpdate {
    pub blood_type: String,
}

/// Owner-only: a donor may set the blood type on their own profile.
#[utoipa::path(patch, path = "/api/donors/{document}/blood-type", tag = "donors", params(("document" = String, Path, description = "Donor document number")), responses((status = 200, description = "Updated donor"), (status = 400, description = "Unknown blood type"), (status = 403, description = "Not the owner")))]
pub async fn set_blood_type(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(document): Path<String>,
    Json(body): Json<BloodTypeUpdate>,
) -> Result<Json<models::donor::Model>, ApiError> {
    let donor = require_donor(&state, &user).await?;
    if donor.document != document {
        return Err(ApiError::forbidden("can only update your own blood type"));
    }
    let updated = models::donor::set_blood_type(&state.db, &donor.document, &body.blood_type).await?;
    Ok(Json(updated))
}
