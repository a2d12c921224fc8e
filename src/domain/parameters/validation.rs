//! Model parameter validation

use thiserror::Error;

use super::ModelParameters;
use crate::domain::DomainError;

const MIN_ESTIMATORS: i64 = 1;
const MAX_ESTIMATORS: i64 = 1000;
const MIN_DEPTH: i64 = 1;
const MIN_SAMPLES_SPLIT: i64 = 2;
const MIN_SAMPLES_LEAF: i64 = 1;
const MIN_LEAF_NODES: i64 = 1;

/// Errors that can occur during parameter validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterValidationError {
    #[error("{field}: ensure this value is greater than or equal to {min}")]
    BelowMinimum { field: &'static str, min: i64 },

    #[error("{field}: ensure this value is less than or equal to {max}")]
    AboveMaximum { field: &'static str, max: i64 },
}

impl ParameterValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::BelowMinimum { field, .. } | Self::AboveMaximum { field, .. } => field,
        }
    }
}

impl From<ParameterValidationError> for DomainError {
    fn from(err: ParameterValidationError) -> Self {
        DomainError::invalid_field(err.field(), err.to_string())
    }
}

/// Validate every set field against its allowed range
///
/// Rules:
/// - n_estimators in [1, 1000]
/// - max_depth >= 1
/// - min_samples_split >= 2
/// - min_samples_leaf >= 1
/// - max_leaf_nodes >= 1
pub fn validate_model_parameters(params: &ModelParameters) -> Result<(), ParameterValidationError> {
    check_range("n_estimators", params.n_estimators, MIN_ESTIMATORS, Some(MAX_ESTIMATORS))?;
    check_range("max_depth", params.max_depth, MIN_DEPTH, None)?;
    check_range("min_samples_split", params.min_samples_split, MIN_SAMPLES_SPLIT, None)?;
    check_range("min_samples_leaf", params.min_samples_leaf, MIN_SAMPLES_LEAF, None)?;
    check_range("max_leaf_nodes", params.max_leaf_nodes, MIN_LEAF_NODES, None)?;
    Ok(())
}

fn check_range(
    field: &'static str,
    value: Option<i64>,
    min: i64,
    max: Option<i64>,
) -> Result<(), ParameterValidationError> {
    let Some(value) = value else {
        return Ok(());
    };

    if value < min {
        return Err(ParameterValidationError::BelowMinimum { field, min });
    }

    if let Some(max) = max {
        if value > max {
            return Err(ParameterValidationError::AboveMaximum { field, max });
        }
    }

    Ok(())
}
