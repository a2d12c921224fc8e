//! Flower Data Science API
//!
//! A small REST service around the Iris dataset:
//! - A dataset catalog (name to URL) kept in one JSON file
//! - Load, clean, split, train, predict and evaluate a random forest
//! - Hyperparameters stored in Firestore or in memory
//! - Firebase Authentication sign-up, sign-in and role claims

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use config::{IdentityBackend, ParameterStoreBackend};
use domain::{DocumentStore, IdentityProvider};
use infrastructure::{
    dataset::JsonFileConfigStore,
    firebase::{FirebaseClient, FirebaseIdentityProvider, FirestoreDocumentStore},
    http_client::{HttpClient, HttpClientTrait},
    identity::InMemoryIdentityProvider,
    iris::{LocalCsvSource, ModelArtifact, RemoteZipSource},
    parameters::InMemoryDocumentStore,
    rate_limit::RateLimiter,
    services::{AuthService, DatasetRegistry, IrisPipeline, ParameterService, PipelineSettings},
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Concrete services wired from configuration
#[derive(Debug, Clone)]
pub struct Services {
    pub registry: Arc<DatasetRegistry>,
    pub parameters: Arc<ParameterService>,
    pub pipeline: Arc<IrisPipeline>,
    pub auth: Arc<AuthService>,
}

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let http: Arc<dyn HttpClientTrait> = Arc::new(HttpClient::with_timeout(HTTP_TIMEOUT)?);
    create_app_state_with_http(config, http).await
}

/// Create the application state with a given HTTP client
pub async fn create_app_state_with_http(
    config: &AppConfig,
    http: Arc<dyn HttpClientTrait>,
) -> anyhow::Result<AppState> {
    let services = build_services(config, http).await?;

    Ok(AppState::new(
        services.registry,
        services.pipeline,
        services.parameters,
        services.auth,
        Arc::new(RateLimiter::per_minute(config.rate_limit.users_per_minute)),
    ))
}

/// Build every service, selecting backends from configuration
pub async fn build_services(
    config: &AppConfig,
    http: Arc<dyn HttpClientTrait>,
) -> anyhow::Result<Services> {
    let firebase = firebase_client(config, http.clone())?;

    let registry = Arc::new(DatasetRegistry::new(Arc::new(JsonFileConfigStore::new(
        &config.storage.datasets_path,
    ))));
    info!(path = %config.storage.datasets_path, "Dataset catalog configured");

    let document_store = document_store(config, &firebase).await?;
    let parameters = Arc::new(ParameterService::new(
        document_store,
        &config.parameter_store.collection,
        &config.parameter_store.document_id,
    ));

    let pipeline = Arc::new(IrisPipeline::new(
        registry.clone(),
        parameters.clone(),
        LocalCsvSource::new(&config.storage.iris_csv_path),
        RemoteZipSource::new(http),
        ModelArtifact::new(&config.storage.model_path),
        PipelineSettings {
            dataset_name: config.pipeline.dataset_name.clone(),
            test_fraction: config.pipeline.test_fraction,
            seed: config.pipeline.seed,
        },
    ));

    let identity: Arc<dyn IdentityProvider> = match config.identity.backend {
        IdentityBackend::Firebase => {
            Arc::new(FirebaseIdentityProvider::new(require_firebase(&firebase)?))
        }
        IdentityBackend::Memory => Arc::new(InMemoryIdentityProvider::default()),
    };
    info!(backend = identity.name(), "Identity provider configured");

    Ok(Services {
        registry,
        parameters,
        pipeline,
        auth: Arc::new(AuthService::new(identity)),
    })
}

/// Shared Firebase client, built only when a backend needs it
fn firebase_client(
    config: &AppConfig,
    http: Arc<dyn HttpClientTrait>,
) -> anyhow::Result<Option<Arc<FirebaseClient>>> {
    let needed = config.identity.backend == IdentityBackend::Firebase
        || config.parameter_store.backend == ParameterStoreBackend::Firestore;

    if !needed {
        return Ok(None);
    }

    let client = FirebaseClient::new(config.firebase.clone(), http)
        .context("Firebase backend selected but not configured")?;
    info!(project_id = %client.project_id(), "Firebase client configured");

    Ok(Some(Arc::new(client)))
}

async fn document_store(
    config: &AppConfig,
    firebase: &Option<Arc<FirebaseClient>>,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.parameter_store.backend {
        ParameterStoreBackend::Firestore => {
            Arc::new(FirestoreDocumentStore::new(require_firebase(firebase)?))
        }
        ParameterStoreBackend::Memory => Arc::new(
            InMemoryDocumentStore::seeded_from_file(
                Path::new(&config.storage.parameters_seed_path),
                &config.parameter_store.collection,
                &config.parameter_store.document_id,
            )
            .await?,
        ),
    };
    info!(backend = store.backend(), "Parameter store configured");

    Ok(store)
}

fn require_firebase(client: &Option<Arc<FirebaseClient>>) -> anyhow::Result<Arc<FirebaseClient>> {
    client
        .clone()
        .context("Firebase client missing for a Firebase backend")
}
