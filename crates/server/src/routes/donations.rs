use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use tracing::info;

use models::donation::{self, NewDonation};

use crate::errors::ApiError;
use crate::routes::auth::{require_donor, require_entity, AuthedUser, ServerState};

#[derive(Serialize)]
pub struct DonationWithDonor {
    #[serde(flatten)]
    pub donation: donation::Model,
    pub donor_name: Option<String>,
    pub donor_blood_type: Option<String>,
}

/// Donors get their own history; entities get every recorded donation.
#[utoipa::path(get, path = "/api/donations", tag = "donations", responses((status = 200, description = "Donations list")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<DonationWithDonor>>, ApiError> {
    if user.is_donor() {
        let donor = require_donor(&state, &user).await?;
        let rows = donation::list_for_donor(&state.db, &donor.document).await?;
        let out = rows
            .into_iter()
            .map(|d| DonationWithDonor {
                donation: d,
                donor_name: Some(donor.name.clone()),
                donor_blood_type: donor.blood_type.clone(),
            })
            .collect();
        return Ok(Json(out));
    }
    require_entity(&state, &user).await?;
    let rows = donation::list_with_donors(&state.db).await?;
    let out = rows
        .into_iter()
        .map(|(d, donor)| {
            let (name, blood) = match donor {
                Some(donor) => (Some(donor.name), donor.blood_type),
                None => (None, None),
            };
            DonationWithDonor { donation: d, donor_name: name, donor_blood_type: blood }
        })
        .collect();
    Ok(Json(out))
}

#[derive(Serialize)]
pub struct RecordedDonation {
    #[serde(flatten)]
    pub donation: donation::Model,
    pub inventory_updated: bool,
}

/// Entity records a donation against a donor document. When the donor has a
/// known blood type the entity's stock for that type gains the volume and one
/// unit; an untyped donor leaves stock untouched.
#[utoipa::path(post, path = "/api/donations", tag = "donations", responses((status = 201, description = "Donation recorded"), (status = 404, description = "Unknown donor")))]
pub async fn record(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(mut body): Json<NewDonation>,
) -> Result<(StatusCode, Json<RecordedDonation>), ApiError> {
    let entity = require_entity(&state, &user).await?;
    let donor = models::donor::find_by_document(&state.db, &body.donor_document)
        .await?
        .ok_or_else(|| ApiError::not_found("donor not found"))?;

    if body.center.is_none() {
        body.center = Some(entity.name.clone());
    }
    let center = body.center.clone();
    let amount_ml = body.amount_ml;
    let created = donation::create(&state.db, body).await?;

    let inventory_updated = match donor.blood_type.as_deref() {
        Some(blood) => {
            models::blood_inventory::add_donation(&state.db, entity.id, blood, amount_ml, center)
                .await?;
            true
        }
        None => false,
    };

    info!(donation_id = %created.id, donor = %donor.document, inventory_updated, "donation_recorded");
    Ok((StatusCode::CREATED, Json(RecordedDonation { donation: created, inventory_updated })))
}
