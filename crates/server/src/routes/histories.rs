use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::clinical_history::{self, Questionnaire};

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, require_entity, AuthedUser, ServerState};

#[derive(Serialize)]
pub struct HistoryWithDonor {
    #[serde(flatten)]
    pub history: clinical_history::Model,
    pub donor_name: Option<String>,
}

/// Entities see every submitted questionnaire; donors see their own.
#[utoipa::path(get, path = "/api/clinical-histories", tag = "clinical-histories", responses((status = 200, description = "Histories list")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<HistoryWithDonor>>, ApiError> {
    if user.is_donor() {
        let donor = require_donor(&state, &user).await?;
        let rows = clinical_history::find_by_donor(&state.db, &donor.document).await?;
        let out = rows
            .into_iter()
            .map(|h| HistoryWithDonor { history: h, donor_name: Some(donor.name.clone()) })
            .collect();
        return Ok(Json(out));
    }
    require_entity(&state, &user).await?;
    let rows = clinical_history::list_with_donors(&state.db).await?;
    let out = rows
        .into_iter()
        .map(|(h, d)| HistoryWithDonor { history: h, donor_name: d.map(|d| d.name) })
        .collect();
    Ok(Json(out))
}

/// One donor's history. A donor may only fetch their own; entities may fetch
/// any. The body is `null` when the donor has not submitted yet.
#[utoipa::path(get, path = "/api/clinical-histories/{document}", tag = "clinical-histories", params(("document" = String, Path, description = "Donor document number")), responses((status = 200, description = "History or null"), (status = 403, description = "Not yours"), (status = 404, description = "Unknown donor")))]
pub async fn get_for_donor(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(document): Path<String>,
) -> Result<Json<Option<clinical_history::Model>>, ApiError> {
    if user.is_donor() {
        let donor = require_donor(&state, &user).await?;
        if donor.document != document {
            return Err(ApiError::forbidden("can only read your own clinical history"));
        }
    } else {
        require_entity(&state, &user).await?;
    }
    models::donor::find_by_document(&state.db, &document)
        .await?
        .ok_or_else(|| ApiError::not_found("donor not found"))?;
    let history = clinical_history::find_by_donor(&state.db, &document).await?;
    Ok(Json(history))
}

/// Donor submits (or resubmits) the questionnaire; review state resets.
#[utoipa::path(post, path = "/api/clinical-histories", tag = "clinical-histories", responses((status = 201, description = "History stored")))]
pub async fn submit(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(body): Json<Questionnaire>,
) -> Result<(StatusCode, Json<clinical_history::Model>), ApiError> {
    let donor = require_donor(&state, &user).await?;
    let history = clinical_history::upsert_for_donor(&state.db, &donor.document, body).await?;
    Ok((StatusCode::CREATED, Json(history)))
}

#[derive(Deserialize)]
pub struct ReviewBody {
    pub status: String,
    pub medical_notes: Option<String>,
}

/// Entity review: approve or reject with optional notes.
#[utoipa::path(patch, path = "/api/clinical-histories/{id}", tag = "clinical-histories", params(("id" = Uuid, Path, description = "History id")), responses((status = 200, description = "Reviewed history"), (status = 404, description = "Unknown history")))]
pub async fn review(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<clinical_history::Model>, ApiError> {
    require_entity(&state, &user).await?;
    let history = clinical_history::review(&state.db, id, &body.status, body.medical_notes).await?;
    Ok(Json(history))
}
