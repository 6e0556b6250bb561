use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use models::notification_preference;

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, AuthedUser, ServerState};

#[derive(Deserialize)]
pub struct PreferenceBody {
    pub receive_notifications: bool,
    pub emergencies_only: bool,
}

/// No stored row means the defaults: opted in, all urgencies.
#[utoipa::path(get, path = "/api/notification-preferences", tag = "notifications", responses((status = 200, description = "Current preference")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let donor = require_donor(&state, &user).await?;
    let stored = notification_preference::find_for_donor(&state.db, &donor.document).await?;
    let out = match stored {
        Some(p) => serde_json::json!({
            "receive_notifications": p.receive_notifications,
            "emergencies_only": p.emergencies_only,
            "updated_at": p.updated_at,
        }),
        None => serde_json::json!({
            "receive_notifications": true,
            "emergencies_only": false,
            "updated_at": null,
        }),
    };
    Ok(Json(out))
}

#[utoipa::path(put, path = "/api/notification-preferences", tag = "notifications", responses((status = 200, description = "Stored preference")))]
pub async fn put(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(body): Json<PreferenceBody>,
) -> Result<Json<notification_preference::Model>, ApiError> {
    let donor = require_donor(&state, &user).await?;
    let stored = notification_preference::upsert(
        &state.db,
        &donor.document,
        body.receive_notifications,
        body.emergencies_only,
    )
    .await?;
    Ok(Json(stored))
}
