//! Config store trait

use async_trait::async_trait;

use super::DatasetCatalog;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Durable storage for the whole dataset catalog
///
/// Implementations read and rewrite the complete document; there is no
/// partial update and no locking between concurrent writers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read and parse the full catalog
    async fn load(&self) -> Result<DatasetCatalog, DomainError>;

    /// Replace the stored catalog with `catalog`
    async fn save(&self, catalog: &DatasetCatalog) -> Result<(), DomainError>;

    /// Human-readable location of the backing document, used in logs
    fn location(&self) -> String;
}
