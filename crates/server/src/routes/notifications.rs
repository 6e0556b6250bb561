use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use models::{blood_request, notification};

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, AuthedUser, ServerState};

#[derive(Serialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub notification: notification::Model,
    pub request: Option<blood_request::Model>,
}

/// Donor notification feed, newest first, with originating requests attached.
#[utoipa::path(get, path = "/api/notifications", tag = "notifications", responses((status = 200, description = "Notification feed")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<FeedItem>>, ApiError> {
    let donor = require_donor(&state, &user).await?;
    let rows = notification::list_for_donor_with_requests(&state.db, &donor.document).await?;
    let out = rows
        .into_iter()
        .map(|(n, r)| FeedItem { notification: n, request: r })
        .collect();
    Ok(Json(out))
}

#[utoipa::path(patch, path = "/api/notifications/{id}/read", tag = "notifications", params(("id" = Uuid, Path, description = "Notification id")), responses((status = 200, description = "Marked read"), (status = 404, description = "Not yours or unknown")))]
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<notification::Model>, ApiError> {
    let donor = require_donor(&state, &user).await?;
    let updated = notification::mark_read(&state.db, id, &donor.document).await?;
    Ok(Json(updated))
}
