//! API error type and its JSON body

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    ValidationError,
    AuthenticationError,
    PermissionError,
    NotFoundError,
    ConflictError,
    RateLimitError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::PermissionError => write!(f, "permission_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::RateLimitError => write!(f, "rate_limit_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, detail: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                detail: detail.into(),
                error_type,
                param: None,
            },
            retry_after: None,
        }
    }

    /// Name the offending input field
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.param = Some(param.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, ApiErrorType::ValidationError, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError, detail)
    }

    /// Role failures answer 401 like authentication failures
    pub fn permission_denied(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::PermissionError, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, detail)
    }

    /// Duplicate resources answer 403
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorType::ConflictError, detail)
    }

    pub fn rate_limited(detail: impl Into<String>, retry_after_secs: u64) -> Self {
        let mut err = Self::new(StatusCode::TOO_MANY_REQUESTS, ApiErrorType::RateLimitError, detail);
        err.retry_after = Some(retry_after_secs);
        err
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = %self.response.detail, "Request failed");
        }

        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(secs) = self.retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let detail = err.detail();

        match err {
            DomainError::Validation { field, .. } => {
                let api = Self::unprocessable(detail);
                match field {
                    Some(field) => api.with_param(field),
                    None => api,
                }
            }
            DomainError::NotFound { .. } | DomainError::InvalidSource { .. } => Self::not_found(detail),
            DomainError::Conflict { .. } => Self::conflict(detail),
            DomainError::Unauthorized { .. } => Self::unauthorized(detail),
            DomainError::Forbidden { .. } => Self::permission_denied(detail),
            DomainError::RateLimited {
                retry_after_secs, ..
            } => Self::rate_limited(detail, retry_after_secs),
            DomainError::ProviderRejected { .. } => Self::bad_request(detail),
            DomainError::Provider { .. }
            | DomainError::Network { .. }
            | DomainError::StoreUnavailable { .. }
            | DomainError::StoreCorrupt { .. }
            | DomainError::DataUnavailable { .. }
            | DomainError::Schema { .. }
            | DomainError::Training { .. }
            | DomainError::Persistence { .. }
            | DomainError::ModelUnavailable { .. }
            | DomainError::Inference { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => Self::internal(detail),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error_type, self.response.detail)
    }
}

impl std::error::Error for ApiError {}
