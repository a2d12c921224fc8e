//! Authentication and user management endpoints
//!
//! Registration and login go through the identity provider; the user
//! listing and role endpoints require an admin token.

use std::str::FromStr;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::middleware::{ClientIp, RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiErrorType, Json};
use crate::domain::{DomainError, IdentityClaims, Role};
use crate::infrastructure::observability::record_rate_limited;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/active", get(active_user))
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/users", get(list_users))
        .route("/users/{user_id}/role", get(get_user_role).put(set_user_role))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
    pub role: Option<Role>,
}

/// OAuth2 password grant form
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user_id: String,
    pub role: Option<Role>,
}

/// Unknown role names are client errors
fn parse_role(role: &str) -> Result<Role, ApiError> {
    Role::from_str(role).map_err(|e| ApiError::bad_request(e.detail()).with_param("role"))
}

/// GET /active
pub async fn active_user(RequireUser(claims): RequireUser) -> Json<IdentityClaims> {
    Json(claims)
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let role = request.role.as_deref().map(parse_role).transpose()?;

    let registration = state
        .auth_service
        .register(&request.email, &request.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id: registration.user_id,
            email: registration.email,
            role: registration.role,
        }),
    ))
}

/// POST /token
pub async fn token(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(form) = form.map_err(|rejection| {
        ApiError::new(
            rejection.status(),
            ApiErrorType::ValidationError,
            rejection.body_text(),
        )
    })?;

    let access_token = state.auth_service.login(&form.username, &form.password).await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /users
///
/// The admin check runs before the per-address limit is consulted.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ClientIp(client_ip): ClientIp,
) -> Result<Json<Vec<IdentityClaims>>, ApiError> {
    let limiter = &state.users_rate_limiter;
    let window = limiter.check_and_record(&client_ip).await;

    if !window.allowed {
        warn!(client_ip = %client_ip, user_id = %admin.user_id, "User listing rate limited");
        record_rate_limited("/users");
        return Err(DomainError::rate_limited(
            format!("Rate limit exceeded: {} per 1 minute", window.limit),
            window.reset_in_seconds,
        )
        .into());
    }

    let users = state.auth_service.list_users().await?;
    Ok(Json(users))
}

/// GET /users/{user_id}/role
pub async fn get_user_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<RoleResponse>, ApiError> {
    let role = state.auth_service.get_role(&user_id).await?;

    Ok(Json(RoleResponse {
        message: None,
        user_id,
        role,
    }))
}

/// PUT /users/{user_id}/role
pub async fn set_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<RoleRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    let role = parse_role(&request.role)?;

    state.auth_service.set_role(&user_id, role).await?;
    info!(user_id = %user_id, role = %role, by = %admin.user_id, "Role assigned");

    Ok(Json(RoleResponse {
        message: Some("Role updated".to_string()),
        user_id,
        role: Some(role),
    }))
}
