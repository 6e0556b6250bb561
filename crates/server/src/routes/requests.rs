use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use models::blood_request::{self, NewBloodRequest, URGENCY_CRITICAL};
use service::notify::{
    domain::FanoutRequest, repo::seaorm::SeaOrmNotifyRepository, service::NotifyService,
};

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, require_entity, AuthedUser, ServerState};

#[derive(Deserialize)]
pub struct CreateRequestBody {
    pub blood_type: String,
    pub amount_ml: i32,
    pub urgency: String,
    pub required_date: NaiveDate,
    pub observations: Option<String>,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct EmergencyRequestBody {
    pub blood_type: String,
    pub amount_ml: i32,
    pub observations: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedRequest {
    #[serde(flatten)]
    pub request: blood_request::Model,
    pub donors_notified: usize,
}

/// Entities see their own requests; donors see the few most recent requests
/// matching their blood type. A donor without a registered blood type has an
/// empty feed.
#[utoipa::path(get, path = "/api/requests", tag = "requests", responses((status = 200, description = "Requests list")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<blood_request::Model>>, ApiError> {
    if user.is_donor() {
        let donor = require_donor(&state, &user).await?;
        let rows = match donor.blood_type.as_deref() {
            Some(blood) => blood_request::list_for_blood_type(&state.db, blood).await?,
            None => Vec::new(),
        };
        return Ok(Json(rows));
    }
    let entity = require_entity(&state, &user).await?;
    let rows = blood_request::list_for_entity(&state.db, entity.id).await?;
    Ok(Json(rows))
}

async fn store_and_fan_out(
    state: &ServerState,
    input: NewBloodRequest,
) -> Result<CreatedRequest, ApiError> {
    let created = blood_request::create(&state.db, input).await?;

    let repo = Arc::new(SeaOrmNotifyRepository { db: state.db.clone() });
    let donors_notified = NotifyService::new(repo)
        .fan_out(&FanoutRequest {
            id: created.id,
            blood_type: created.blood_type.clone(),
            amount_ml: created.amount_ml,
            urgency: created.urgency.clone(),
            location: created.location.clone(),
            emergency: created.emergency,
        })
        .await?;

    info!(request_id = %created.id, donors_notified, emergency = created.emergency, "blood_request_created");
    Ok(CreatedRequest { request: created, donors_notified })
}

#[utoipa::path(post, path = "/api/requests", tag = "requests", request_body = crate::openapi::BloodRequestBody, responses((status = 201, description = "Request created"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<CreatedRequest>), ApiError> {
    let entity = require_entity(&state, &user).await?;
    let out = store_and_fan_out(
        &state,
        NewBloodRequest {
            entity_id: entity.id,
            blood_type: body.blood_type,
            amount_ml: body.amount_ml,
            urgency: body.urgency,
            required_date: body.required_date,
            observations: body.observations,
            emergency: false,
            location: body.location.or(entity.location),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(out)))
}

/// Emergency shortcut: urgency is forced to Critical, the required date is
/// today, and the fan-out reaches every opted-in donor of the type,
/// including emergencies-only donors.
#[utoipa::path(post, path = "/api/requests/emergency", tag = "requests", responses((status = 201, description = "Emergency created")))]
pub async fn create_emergency(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(body): Json<EmergencyRequestBody>,
) -> Result<(StatusCode, Json<CreatedRequest>), ApiError> {
    let entity = require_entity(&state, &user).await?;
    let out = store_and_fan_out(
        &state,
        NewBloodRequest {
            entity_id: entity.id,
            blood_type: body.blood_type,
            amount_ml: body.amount_ml,
            urgency: URGENCY_CRITICAL.to_string(),
            required_date: chrono::Utc::now().date_naive(),
            observations: body
                .observations
                .or_else(|| Some("Emergency request, immediate need".to_string())),
            emergency: true,
            location: body.location.or(entity.location),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(out)))
}
