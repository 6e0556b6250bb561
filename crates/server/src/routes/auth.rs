use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::{
    domain::{AuthUser, Claims, LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

/// Verified caller identity, injected into request extensions by the
/// bearer-token middleware.
#[derive(Clone, Debug)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthedUser {
    pub fn is_donor(&self) -> bool {
        self.role == models::user::ROLE_DONOR
    }

    pub fn is_entity(&self) -> bool {
        self.role == models::user::ROLE_ENTITY
    }
}

#[derive(Serialize)]
pub struct SessionOutput {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
}

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            token_ttl_days: state.auth.token_ttl_days,
        },
    )
}

fn session_output(user: AuthUser, token: Option<String>) -> Result<SessionOutput, ApiError> {
    let token = token.ok_or_else(|| ApiError::internal("token generation failed"))?;
    Ok(SessionOutput { user_id: user.id, email: user.email, role: user.role, token })
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<SessionOutput>), ApiError> {
    let session = auth_service(&state).register(input).await?;
    let out = session_output(session.user, session.token)?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<SessionOutput>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    let out = session_output(session.user, session.token)?;
    Ok(Json(out))
}

/// Profile row of whoever holds the token, donor or entity.
#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Profile"), (status = 404, description = "Profile missing")))]
pub async fn me(
    State(state): State<ServerState>,
    axum::Extension(user): axum::Extension<AuthedUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if user.is_donor() {
        let donor = models::donor::find_by_user(&state.db, user.id)
            .await?
            .ok_or_else(|| ApiError::not_found("donor profile not found"))?;
        return Ok(Json(serde_json::to_value(donor).map_err(|e| ApiError::internal(e.to_string()))?));
    }
    let entity = models::medical_entity::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("entity profile not found"))?;
    Ok(Json(serde_json::to_value(entity).map_err(|e| ApiError::internal(e.to_string()))?))
}

/// Resolve the donor profile behind the token; 403 when the caller is not a
/// donor, 404 when the profile row is missing.
pub async fn require_donor(state: &ServerState, user: &AuthedUser) -> Result<models::donor::Model, ApiError> {
    if !user.is_donor() {
        return Err(ApiError::forbidden("donor role required"));
    }
    models::donor::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("donor profile not found"))
}

/// Resolve the entity profile behind the token; 403 for non-entities.
pub async fn require_entity(
    state: &ServerState,
    user: &AuthedUser,
) -> Result<models::medical_entity::Model, ApiError> {
    if !user.is_entity() {
        return Err(ApiError::forbidden("entity role required"));
    }
    models::medical_entity::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("entity profile not found"))
}

/// Global middleware: everything outside the whitelist needs
/// `Authorization: Bearer <token>`. A missing token is 400, an invalid or
/// expired one 401.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Whitelist: health, register/login, swagger docs, CORS preflight
    if path == "/api/health"
        || path == "/api/auth/login"
        || path == "/api/auth/register"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match authz {
        Some(h) => {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        }
        None => {
            tracing::warn!(path = %path, "missing Authorization header");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            let claims = data.claims;
            let id = claims.sub.parse::<Uuid>().map_err(|_| StatusCode::UNAUTHORIZED)?;
            req.extensions_mut().insert(AuthedUser { id, email: claims.email, role: claims.role });
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
