//! Iris pipeline endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DomainError;

type Records = Vec<Map<String, Value>>;

/// Create the iris router
pub fn create_iris_router() -> Router<AppState> {
    Router::new()
        .route("/iris/load", get(load_iris))
        .route("/iris/process", get(process_iris))
        .route("/iris/split", get(split_iris))
        .route("/iris/train", get(train_iris))
        .route("/iris/predict", get(predict_iris))
        .route("/iris/evaluate", get(evaluate_iris))
}

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    pub dataset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    #[serde(rename = "X_train")]
    pub x_train: Records,
    #[serde(rename = "X_test")]
    pub x_test: Records,
    pub y_train: Vec<String>,
    pub y_test: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub model_path: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub accuracy: f64,
    pub test_size: usize,
    pub predicted_labels: Vec<String>,
}

/// Bad sources and unknown datasets stay 404; anything else is a 500.
fn load_failed(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidSource { .. } => {
            ApiError::not_found(format!("Invalid URL provided for the dataset: {}", err.detail()))
        }
        DomainError::NotFound { .. } => ApiError::from(err),
        other => step_failed("fetching the dataset")(other),
    }
}

/// Every failure past loading is a 500 naming the step.
fn step_failed(step: &'static str) -> impl Fn(DomainError) -> ApiError {
    move |err| ApiError::internal(format!("An error occurred while {}: {}", step, err.detail()))
}

/// GET /iris/load[?dataset=name]
pub async fn load_iris(
    State(state): State<AppState>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<Records>, ApiError> {
    let table = state
        .iris_service
        .load(query.dataset.as_deref())
        .await
        .map_err(load_failed)?;

    Ok(Json(table.to_records()))
}

/// GET /iris/process
pub async fn process_iris(State(state): State<AppState>) -> Result<Json<Records>, ApiError> {
    let table = state
        .iris_service
        .process()
        .await
        .map_err(step_failed("processing the dataset"))?;

    Ok(Json(table.to_records()))
}

/// GET /iris/split
pub async fn split_iris(State(state): State<AppState>) -> Result<Json<SplitResponse>, ApiError> {
    let split = state
        .iris_service
        .split()
        .await
        .map_err(step_failed("splitting the dataset"))?;

    Ok(Json(SplitResponse {
        x_train: split.x_train.to_records(),
        x_test: split.x_test.to_records(),
        y_train: split.y_train,
        y_test: split.y_test,
    }))
}

/// GET /iris/train
pub async fn train_iris(State(state): State<AppState>) -> Result<Json<TrainResponse>, ApiError> {
    let model_path = state
        .iris_service
        .train()
        .await
        .map_err(step_failed("training the model"))?;
    Ok(Json(TrainResponse { model_path }))
}

/// GET /iris/predict
pub async fn predict_iris(State(state): State<AppState>) -> Result<Json<PredictResponse>, ApiError> {
    let predicted_labels = state
        .iris_service
        .predict()
        .await
        .map_err(step_failed("predicting the test split"))?;
    Ok(Json(PredictResponse { predicted_labels }))
}

/// GET /iris/evaluate
pub async fn evaluate_iris(
    State(state): State<AppState>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let evaluation = state
        .iris_service
        .evaluate()
        .await
        .map_err(step_failed("evaluating the model"))?;

    Ok(Json(EvaluateResponse {
        accuracy: evaluation.accuracy,
        test_size: evaluation.test_size,
        predicted_labels: evaluation.predicted_labels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_source_is_not_found() {
        let err = load_failed(DomainError::invalid_source("Not a zip archive"));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(
            err.response.detail,
            "Invalid URL provided for the dataset: Not a zip archive"
        );
    }

    #[test]
    fn test_unknown_dataset_stays_not_found_on_load() {
        let err = load_failed(DomainError::not_found("Dataset not found in configuration file: wine"));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_source_failures_after_load_are_server_errors() {
        for err in [
            DomainError::invalid_source("Not a zip archive"),
            DomainError::not_found("Dataset not found in configuration file: iris"),
        ] {
            let err = step_failed("training the model")(err);
            assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(err.response.detail.starts_with("An error occurred while training the model: "));
        }
    }

    #[test]
    fn test_other_failures_name_the_step() {
        let err = step_failed("processing the dataset")(DomainError::data_unavailable("missing file"));

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.response.detail,
            "An error occurred while processing the dataset: missing file"
        );
    }

    #[test]
    fn test_split_response_uses_frame_names() {
        let response = SplitResponse {
            x_train: vec![],
            x_test: vec![],
            y_train: vec!["setosa".into()],
            y_test: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("X_train").is_some());
        assert!(json.get("X_test").is_some());
        assert_eq!(json["y_train"][0], "setosa");
    }
}
