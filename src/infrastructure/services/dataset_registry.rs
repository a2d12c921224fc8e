//! Dataset registry - CRUD over the dataset catalog

use std::sync::Arc;

use tracing::info;

use crate::domain::dataset::{validate_dataset, ConfigStore, DatasetRecord};
use crate::domain::DomainError;

/// Dataset registry service
///
/// Every mutation reads the whole catalog, changes it and writes it back.
#[derive(Clone)]
pub struct DatasetRegistry {
    store: Arc<dyn ConfigStore>,
}

impl std::fmt::Debug for DatasetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetRegistry")
            .field("store", &self.store.location())
            .finish()
    }
}

impl DatasetRegistry {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Get a dataset by name
    pub async fn get(&self, name: &str) -> Result<DatasetRecord, DomainError> {
        let catalog = self.store.load().await?;

        catalog.get(name).ok_or_else(|| {
            DomainError::not_found(format!("Dataset not found in configuration file: {}", name))
        })
    }

    /// Register a new dataset
    pub async fn create(&self, record: DatasetRecord) -> Result<DatasetRecord, DomainError> {
        validate_dataset(&record)?;

        let mut catalog = self.store.load().await?;
        if catalog.contains(&record.name) {
            return Err(DomainError::conflict(format!(
                "Dataset already exists: {}. Use PUT if you wish to update it.",
                record.name
            )));
        }

        catalog.insert(record.clone());
        self.store.save(&catalog).await?;

        info!(dataset = %record.name, url = %record.url, "Dataset registered");
        Ok(record)
    }

    /// Create or replace a dataset. Returns whether it was created.
    pub async fn upsert(&self, record: DatasetRecord) -> Result<(DatasetRecord, bool), DomainError> {
        validate_dataset(&record)?;

        let mut catalog = self.store.load().await?;
        let created = catalog.insert(record.clone()).is_none();
        self.store.save(&catalog).await?;

        info!(dataset = %record.name, created, "Dataset upserted");
        Ok((record, created))
    }

    /// Remove a dataset
    pub async fn delete(&self, name: &str) -> Result<(), DomainError> {
        let mut catalog = self.store.load().await?;

        if catalog.remove(name).is_none() {
            return Err(DomainError::not_found(format!("Dataset not found: {}", name)));
        }

        self.store.save(&catalog).await?;

        info!(dataset = %name, "Dataset deleted");
        Ok(())
    }

    /// Whether the catalog can be read
    pub async fn check_ready(&self) -> Result<(), DomainError> {
        self.store.load().await.map(|_| ())
    }
}
