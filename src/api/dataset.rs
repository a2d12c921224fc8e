//! Dataset catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DatasetRecord;

/// Create the dataset router
pub fn create_dataset_router() -> Router<AppState> {
    Router::new()
        .route("/dataset", post(create_dataset).put(upsert_dataset))
        .route("/dataset/{dataset_id}", get(get_dataset).delete(delete_dataset))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /dataset/{dataset_id}
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Result<Json<DatasetRecord>, ApiError> {
    debug!(dataset = %dataset_id, "Getting dataset");

    let record = state.dataset_service.get(&dataset_id).await?;
    Ok(Json(record))
}

/// POST /dataset
pub async fn create_dataset(
    State(state): State<AppState>,
    Json(record): Json<DatasetRecord>,
) -> Result<(StatusCode, Json<DatasetRecord>), ApiError> {
    let record = state.dataset_service.create(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /dataset
///
/// Answers 201 when the dataset did not exist before, 200 otherwise.
pub async fn upsert_dataset(
    State(state): State<AppState>,
    Json(record): Json<DatasetRecord>,
) -> Result<(StatusCode, Json<DatasetRecord>), ApiError> {
    let (record, created) = state.dataset_service.upsert(record).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(record)))
}

/// DELETE /dataset/{dataset_id}
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.dataset_service.delete(&dataset_id).await?;

    Ok(Json(MessageResponse {
        message: format!("Dataset {} was successfully deleted", dataset_id),
    }))
}
