use chrono::NaiveDate;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub name: String,
    /// Required for donors, ignored for entities.
    pub document: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct BloodRequestBody {
    pub blood_type: String,
    pub amount_ml: i32,
    pub urgency: String,
    pub required_date: NaiveDate,
    pub observations: Option<String>,
    pub location: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::donors::get_donor,
        crate::routes::donors::set_blood_type,
        crate::routes::histories::list,
        crate::routes::histories::get_for_donor,
        crate::routes::histories::submit,
        crate::routes::histories::review,
        crate::routes::donations::list,
        crate::routes::donations::record,
        crate::routes::requests::list,
        crate::routes::requests::create,
        crate::routes::requests::create_emergency,
        crate::routes::reports::donations,
        crate::routes::search::search,
        crate::routes::inventory::list,
        crate::routes::inventory::update,
        crate::routes::notifications::list,
        crate::routes::notifications::mark_read,
        crate::routes::preferences::get,
        crate::routes::preferences::put,
    ),
    components(schemas(HealthResponse, RegisterRequest, LoginRequest, BloodRequestBody)),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "donors"),
        (name = "clinical-histories"),
        (name = "donations"),
        (name = "requests"),
        (name = "reports"),
        (name = "search"),
        (name = "inventory"),
        (name = "notifications")
    )
)]
pub struct ApiDoc;
