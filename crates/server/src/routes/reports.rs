use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use models::donation::{self, DonationFilter};
use service::report::{aggregate, DonationRecord, DonationStats};

use crate::errors::ApiError;
use crate::routes::auth::{require_entity, AuthedUser, ServerState};
use crate::routes::donations::DonationWithDonor;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub center: Option<String>,
    pub blood_type: Option<String>,
}

#[derive(Serialize)]
pub struct DonationReport {
    pub donations: Vec<DonationWithDonor>,
    pub stats: DonationStats,
}

/// The filtered donations plus statistics grouped by blood type, center and
/// month.
#[utoipa::path(get, path = "/api/reports/donations", tag = "reports", responses((status = 200, description = "Donations and aggregated stats"), (status = 403, description = "Not an entity")))]
pub async fn donations(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<DonationReport>, ApiError> {
    require_entity(&state, &user).await?;
    if let Some(blood) = q.blood_type.as_deref() {
        models::blood_type::validate(blood)?;
    }
    let rows = donation::list_filtered_with_donors(
        &state.db,
        DonationFilter { from: q.from, to: q.to, center: q.center, blood_type: q.blood_type },
    )
    .await?;
    let records: Vec<DonationRecord> = rows
        .iter()
        .map(|(d, donor)| DonationRecord {
            donation_date: d.donation_date,
            amount_ml: d.amount_ml,
            center: d.center.clone(),
            blood_type: donor.as_ref().and_then(|d| d.blood_type.clone()),
        })
        .collect();
    let stats = aggregate(&records);
    let donations = rows
        .into_iter()
        .map(|(d, donor)| {
            let (name, blood) = match donor {
                Some(donor) => (Some(donor.name), donor.blood_type),
                None => (None, None),
            };
            DonationWithDonor { donation: d, donor_name: name, donor_blood_type: blood }
        })
        .collect();
    Ok(Json(DonationReport { donations, stats }))
}
