//! Parameters domain - random forest hyperparameter overrides

mod entity;
mod store;
mod validation;

pub use entity::{Criterion, MaxFeatures, ModelParameters};
pub use store::{plan_document_write, Document, DocumentStore, DocumentWrite};
pub use validation::{validate_model_parameters, ParameterValidationError};

#[cfg(test)]
pub use store::MockDocumentStore;
