//! Domain layer - Core business logic and entities

pub mod dataset;
pub mod error;
pub mod identity;
pub mod iris;
pub mod parameters;

pub use dataset::{ConfigStore, DatasetCatalog, DatasetRecord};
pub use error::DomainError;
pub use identity::{IdentityClaims, IdentityProvider, Role};
pub use iris::{FeatureFrame, Split, Table};
pub use parameters::{Document, DocumentStore, ModelParameters};
