//! Dataset domain - registered dataset sources and their catalog

mod catalog;
mod entity;
mod store;
mod validation;

pub use catalog::DatasetCatalog;
pub use entity::DatasetRecord;
pub use store::ConfigStore;
pub use validation::{validate_dataset, validate_dataset_name, validate_dataset_url, DatasetValidationError};

#[cfg(test)]
pub use store::MockConfigStore;
