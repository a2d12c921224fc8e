//! Random forest model and its persisted artifact

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::SplitCriterion;
use tracing::{debug, warn};

use crate::domain::iris::FeatureFrame;
use crate::domain::parameters::{Criterion, ModelParameters};
use crate::domain::DomainError;

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Seed of the forest's bootstrap sampling
const FOREST_SEED: u64 = 42;

/// Fitted forest with the feature layout and class labels it was trained on
#[derive(Serialize, Deserialize)]
pub struct IrisModel {
    feature_columns: Vec<String>,
    classes: Vec<String>,
    forest: Forest,
}

impl std::fmt::Debug for IrisModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrisModel")
            .field("feature_columns", &self.feature_columns)
            .field("classes", &self.classes)
            .field("forest", &"[fitted]")
            .finish()
    }
}

impl IrisModel {
    /// Fit a forest on `features` and `labels`. Unset parameters keep the
    /// library defaults.
    pub fn fit(
        features: &FeatureFrame,
        labels: &[String],
        params: &ModelParameters,
    ) -> Result<Self, DomainError> {
        if features.is_empty() {
            return Err(DomainError::training("Training partition is empty"));
        }
        if features.len() != labels.len() {
            return Err(DomainError::training(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let matrix = features
            .to_matrix()
            .map_err(|e| DomainError::training(e.detail()))?;

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let targets: Vec<u32> = labels
            .iter()
            .map(|label| class_index(&classes, label))
            .collect::<Result<_, _>>()?;

        let x = DenseMatrix::from_2d_vec(&matrix);
        let forest = Forest::fit(&x, &targets, forest_parameters(params, features.columns.len()))
            .map_err(|e| DomainError::training(format!("Random forest fit failed: {}", e)))?;

        debug!(
            rows = features.len(),
            features = features.columns.len(),
            classes = classes.len(),
            "Random forest fitted"
        );

        Ok(Self {
            feature_columns: features.columns.clone(),
            classes,
            forest,
        })
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Predict one label per row of `features`
    pub fn predict(&self, features: &FeatureFrame) -> Result<Vec<String>, DomainError> {
        if features.columns != self.feature_columns {
            return Err(DomainError::inference(format!(
                "Feature columns {:?} do not match the trained layout {:?}",
                features.columns, self.feature_columns
            )));
        }

        if features.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = features
            .to_matrix()
            .map_err(|e| DomainError::inference(e.detail()))?;
        let x = DenseMatrix::from_2d_vec(&matrix);

        let predicted = self
            .forest
            .predict(&x)
            .map_err(|e| DomainError::inference(format!("Prediction failed: {}", e)))?;

        predicted
            .into_iter()
            .map(|index| {
                self.classes.get(index as usize).cloned().ok_or_else(|| {
                    DomainError::inference(format!("Unknown class index {}", index))
                })
            })
            .collect()
    }
}

fn class_index(classes: &[String], label: &str) -> Result<u32, DomainError> {
    classes
        .binary_search_by(|c| c.as_str().cmp(label))
        .map(|i| i as u32)
        .map_err(|_| DomainError::internal(format!("Label '{}' missing from class list", label)))
}

fn forest_parameters(params: &ModelParameters, n_features: usize) -> RandomForestClassifierParameters {
    let mut parameters = RandomForestClassifierParameters::default().with_seed(FOREST_SEED);

    if let Some(n) = params.n_estimators {
        parameters = parameters.with_n_trees(n.clamp(1, u16::MAX as i64) as u16);
    }
    if let Some(depth) = params.max_depth {
        parameters = parameters.with_max_depth(depth.clamp(1, u16::MAX as i64) as u16);
    }
    if let Some(split) = params.min_samples_split {
        parameters = parameters.with_min_samples_split(split.max(2) as usize);
    }
    if let Some(leaf) = params.min_samples_leaf {
        parameters = parameters.with_min_samples_leaf(leaf.max(1) as usize);
    }
    if let Some(criterion) = params.criterion {
        parameters = parameters.with_criterion(match criterion {
            Criterion::Gini => SplitCriterion::Gini,
            Criterion::Entropy => SplitCriterion::Entropy,
        });
    }
    if let Some(max_features) = params.max_features {
        parameters = parameters.with_m(max_features.resolve(n_features));
    }
    if let Some(leaves) = params.max_leaf_nodes {
        warn!(max_leaf_nodes = leaves, "max_leaf_nodes is not supported by the forest and is ignored");
    }

    parameters
}

/// JSON file holding the latest trained model
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    path: PathBuf,
}

impl ModelArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the artifact with `model`
    pub async fn save(&self, model: &IrisModel) -> Result<(), DomainError> {
        let json = serde_json::to_vec(model)
            .map_err(|e| DomainError::persistence(format!("Failed to serialize model: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::persistence(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to write model to {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub async fn load(&self) -> Result<IrisModel, DomainError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::model_unavailable(format!(
                "No trained model at {}. Train the model first.",
                self.path.display()
            )),
            _ => DomainError::model_unavailable(format!(
                "Failed to read model from {}: {}",
                self.path.display(),
                e
            )),
        })?;

        serde_json::from_slice(&content).map_err(|e| {
            DomainError::model_unavailable(format!(
                "Model artifact {} is unreadable: {}",
                self.path.display(),
                e
            ))
        })
    }
}
