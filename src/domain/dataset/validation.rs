//! Dataset validation utilities

use reqwest::Url;
use thiserror::Error;

use super::DatasetRecord;
use crate::domain::DomainError;

/// Errors that can occur during dataset validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetValidationError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl DatasetValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "name",
            Self::InvalidUrl(_) => "url",
        }
    }
}

impl From<DatasetValidationError> for DomainError {
    fn from(err: DatasetValidationError) -> Self {
        DomainError::invalid_field(err.field(), err.to_string())
    }
}

/// Validate a dataset name
///
/// Rules:
/// - Cannot be empty
/// - Only alphanumeric characters
pub fn validate_dataset_name(name: &str) -> Result<(), DatasetValidationError> {
    if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
        return Err(DatasetValidationError::InvalidName(name.to_string()));
    }

    Ok(())
}

/// Validate a dataset URL
///
/// The URL must parse as an absolute URL carrying both a scheme and a host.
/// Reachability is not checked.
pub fn validate_dataset_url(url: &str) -> Result<(), DatasetValidationError> {
    let parsed =
        Url::parse(url).map_err(|_| DatasetValidationError::InvalidUrl(url.to_string()))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(DatasetValidationError::InvalidUrl(url.to_string())),
    }
}

/// Validate a full dataset record, name first
pub fn validate_dataset(record: &DatasetRecord) -> Result<(), DatasetValidationError> {
    validate_dataset_name(&record.name)?;
    validate_dataset_url(&record.url)
}
