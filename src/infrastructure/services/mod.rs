//! Application services

mod auth_service;
mod dataset_registry;
mod iris_pipeline;
mod parameter_service;

pub use auth_service::{AuthService, Registration};
pub use dataset_registry::DatasetRegistry;
pub use iris_pipeline::{Evaluation, IrisPipeline, PipelineSettings};
pub use parameter_service::{ParameterService, ParameterWrite};
