//! Iris pipeline service - acquisition, cleaning, split, training and scoring

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::{DatasetRegistry, ParameterService};
use crate::domain::iris::{clean, train_test_split, Split, Table};
use crate::domain::DomainError;
use crate::infrastructure::iris::{IrisModel, LocalCsvSource, ModelArtifact, RemoteZipSource};
use crate::infrastructure::observability::{record_evaluation, record_training_run};

/// Split settings and the registry entry used to fill the local copy
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub dataset_name: String,
    pub test_fraction: f64,
    pub seed: u64,
}

/// Score of the persisted model on the held-out partition
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub test_size: usize,
    pub predicted_labels: Vec<String>,
}

/// Iris pipeline service
#[derive(Debug, Clone)]
pub struct IrisPipeline {
    registry: Arc<DatasetRegistry>,
    parameters: Arc<ParameterService>,
    local: LocalCsvSource,
    remote: RemoteZipSource,
    artifact: ModelArtifact,
    settings: PipelineSettings,
}

impl IrisPipeline {
    pub fn new(
        registry: Arc<DatasetRegistry>,
        parameters: Arc<ParameterService>,
        local: LocalCsvSource,
        remote: RemoteZipSource,
        artifact: ModelArtifact,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            registry,
            parameters,
            local,
            remote,
            artifact,
            settings,
        }
    }

    /// Raw table. A named dataset is downloaded from its registered URL;
    /// otherwise the local copy is used, fetched from the registry first when
    /// it does not exist yet.
    pub async fn load(&self, dataset: Option<&str>) -> Result<Table, DomainError> {
        if let Some(name) = dataset {
            let record = self.registry.get(name).await?;
            return self.remote.fetch(&record).await;
        }

        if self.local.exists().await {
            return self.local.fetch().await;
        }

        let name = &self.settings.dataset_name;
        warn!(
            path = %self.local.path().display(),
            dataset = %name,
            "Local dataset missing, downloading registered copy"
        );

        let record = self.registry.get(name).await.map_err(|e| match e {
            DomainError::NotFound { .. } => DomainError::data_unavailable(format!(
                "Dataset file {} is missing and no '{}' dataset is registered",
                self.local.path().display(),
                name
            )),
            other => other,
        })?;

        let table = self.remote.fetch(&record).await?;
        self.local.store(&table).await?;
        Ok(table)
    }

    /// Cleaned table
    pub async fn process(&self, dataset: Option<&str>) -> Result<Table, DomainError> {
        Ok(clean(self.load(dataset).await?))
    }

    /// Deterministic train/test partition of the cleaned local dataset
    pub async fn split(&self) -> Result<Split, DomainError> {
        let table = self.process(None).await?;
        train_test_split(&table, self.settings.test_fraction, self.settings.seed)
    }

    /// Fit on the training partition and overwrite the model artifact.
    /// Returns the artifact path.
    pub async fn train(&self) -> Result<String, DomainError> {
        let split = self.split().await?;
        let params = self.parameters.for_training().await?;

        let started = Instant::now();
        let fitted = tokio::task::spawn_blocking(move || {
            IrisModel::fit(&split.x_train, &split.y_train, &params)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Training task failed: {}", e)))?;
        record_training_run(started.elapsed(), fitted.is_ok());

        let model = fitted?;
        self.artifact.save(&model).await?;

        let model_path = self.artifact.path().display().to_string();
        info!(
            model_path = %model_path,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Iris model trained"
        );

        Ok(model_path)
    }

    /// Labels predicted for the test partition by the persisted model
    pub async fn predict(&self) -> Result<Vec<String>, DomainError> {
        let split = self.split().await?;
        self.predict_split(split).await.map(|(predicted, _)| predicted)
    }

    /// Accuracy of the persisted model on the test partition
    pub async fn evaluate(&self) -> Result<Evaluation, DomainError> {
        let split = self.split().await?;
        let (predicted_labels, expected) = self.predict_split(split).await?;

        let test_size = expected.len();
        let correct = predicted_labels
            .iter()
            .zip(&expected)
            .filter(|(predicted, actual)| predicted == actual)
            .count();
        let accuracy = if test_size == 0 {
            0.0
        } else {
            correct as f64 / test_size as f64
        };

        record_evaluation(accuracy, test_size);
        info!(accuracy, test_size, "Iris model evaluated");

        Ok(Evaluation {
            accuracy,
            test_size,
            predicted_labels,
        })
    }

    async fn predict_split(&self, split: Split) -> Result<(Vec<String>, Vec<String>), DomainError> {
        let model = self.artifact.load().await?;
        let Split { x_test, y_test, .. } = split;

        let predicted = tokio::task::spawn_blocking(move || model.predict(&x_test))
            .await
            .map_err(|e| DomainError::internal(format!("Prediction task failed: {}", e)))??;

        Ok((predicted, y_test))
    }
}
