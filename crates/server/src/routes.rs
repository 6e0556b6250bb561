use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod donations;
pub mod donors;
pub mod histories;
pub mod inventory;
pub mod notifications;
pub mod preferences;
pub mod reports;
pub mod requests;
pub mod search;

use auth::ServerState;

#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. Every route except the whitelist in the
/// auth middleware requires a bearer token.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/donors/:document", get(donors::get_donor))
        .route("/api/donors/:document/blood-type", patch(donors::set_blood_type))
        .route("/api/clinical-histories", get(histories::list).post(histories::submit))
        // one segment serves both: GET takes the donor document, PATCH the history id
        .route(
            "/api/clinical-histories/:key",
            get(histories::get_for_donor).patch(histories::review),
        )
        .route("/api/donations", get(donations::list).post(donations::record))
        .route("/api/requests", get(requests::list).post(requests::create))
        .route("/api/requests/emergency", post(requests::create_emergency))
        .route("/api/reports/donations", get(reports::donations))
        .route("/api/blood-search", get(search::search))
        .route("/api/inventory", get(inventory::list))
        .route("/api/inventory/:id", patch(inventory::update))
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/:id/read", patch(notifications::mark_read))
        .route(
            "/api/notification-preferences",
            get(preferences::get).put(preferences::put),
        );

    api.merge(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
    )
    .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
    .with_state(state)
    .layer(cors)
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
