//! Hyperparameter document endpoints

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::{Map, Value};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Document, DomainError, ModelParameters};

/// Create the parameters router
pub fn create_parameters_router() -> Router<AppState> {
    Router::new().route("/parameters", get(get_parameters).put(put_parameters))
}

/// GET /parameters
pub async fn get_parameters(State(state): State<AppState>) -> Result<Json<Document>, ApiError> {
    let params = state.parameter_service.get().await.map_err(|e| {
        ApiError::internal(format!(
            "Error while fetching parameters from Firestore: {}",
            e.detail()
        ))
    })?;

    Ok(Json(params.to_document()))
}

/// PUT /parameters
///
/// Answers with the stored document and 201 or 200 depending on how the
/// incoming fields relate to the stored ones.
pub async fn put_parameters(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let params = ModelParameters::from_document(&body).map_err(update_failed)?;
    let write = state.parameter_service.put(params).await.map_err(update_failed)?;

    let status = if write.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(write.document)))
}

fn update_failed(err: DomainError) -> ApiError {
    let detail = format!("Error while updating parameters: {}", err.detail());

    match err {
        DomainError::Validation { field, .. } => {
            let api = ApiError::bad_request(detail);
            match field {
                Some(field) => api.with_param(field),
                None => api,
            }
        }
        _ => ApiError::internal(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_is_bad_request() {
        let err = update_failed(DomainError::invalid_field(
            "n_estimators",
            "n_estimators must be between 1 and 1000",
        ));

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.param.as_deref(), Some("n_estimators"));
        assert_eq!(
            err.response.detail,
            "Error while updating parameters: n_estimators must be between 1 and 1000"
        );
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err = update_failed(DomainError::provider("firestore", "deadline exceeded"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
