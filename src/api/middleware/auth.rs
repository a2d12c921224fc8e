//! Bearer token extractors backed by the identity provider

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::IdentityClaims;

/// Extractor that requires a valid ID token in `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct RequireUser(pub IdentityClaims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.auth_service.authenticate(&token).await?;
        debug!(user_id = %claims.user_id, "Token verified");

        Ok(RequireUser(claims))
    }
}

/// Extractor that requires a valid ID token carrying the admin role
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub IdentityClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let claims = state.auth_service.authorize_admin(&token).await?;
        debug!(user_id = %claims.user_id, "Admin token verified");

        Ok(RequireAdmin(claims))
    }
}

/// Bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty());

    token
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
}
