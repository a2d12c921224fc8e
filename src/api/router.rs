use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::auth;
use super::dataset;
use super::health;
use super::iris;
use super::middleware::metrics_middleware;
use super::parameters;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .merge(dataset::create_dataset_router())
        .merge(iris::create_iris_router())
        .merge(parameters::create_parameters_router())
        .merge(auth::create_auth_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
