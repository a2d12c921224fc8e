//! JSON extractor whose rejections use the API error body

use axum::{
    extract::{rejection::JsonRejection as AxumRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorType};

/// Wrapper around `axum::Json` that reports malformed bodies as `{"detail": ...}`
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| rejection_error(&rejection))
    }
}

fn rejection_error(rejection: &AxumRejection) -> ApiError {
    let (error_type, detail) = match rejection {
        AxumRejection::JsonDataError(err) => (
            ApiErrorType::ValidationError,
            format!("Invalid JSON data: {}", err.body_text()),
        ),
        AxumRejection::JsonSyntaxError(err) => (
            ApiErrorType::InvalidRequestError,
            format!("Invalid JSON syntax: {}", err.body_text()),
        ),
        AxumRejection::MissingJsonContentType(_) => (
            ApiErrorType::InvalidRequestError,
            "Missing Content-Type header. Expected 'application/json'.".to_string(),
        ),
        AxumRejection::BytesRejection(err) => (
            ApiErrorType::InvalidRequestError,
            format!("Failed to read request body: {}", err.body_text()),
        ),
        _ => (ApiErrorType::InvalidRequestError, "Invalid JSON request".to_string()),
    };

    ApiError::new(rejection.status(), error_type, detail)
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
