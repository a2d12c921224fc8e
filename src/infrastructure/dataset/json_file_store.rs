//! Dataset catalog backed by a single JSON document

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::dataset::{ConfigStore, DatasetCatalog};
use crate::domain::DomainError;

/// Whole-file JSON catalog
///
/// Each save writes its own uniquely named sibling temporary file and
/// renames it over the target, so concurrent writers never share a file.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `contents` to a fresh temporary file next to `path`, then rename it
/// over `path`. The temporary file is removed if any step fails.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::Builder::new()
        .prefix(".catalog-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            DomainError::store_unavailable(format!(
                "Failed to write configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| {
            DomainError::store_unavailable(format!(
                "Failed to write configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

    temp.persist(path).map_err(|e| {
        DomainError::store_unavailable(format!(
            "Failed to replace configuration file {}: {}",
            path.display(),
            e.error
        ))
    })?;

    Ok(())
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn load(&self) -> Result<DatasetCatalog, DomainError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DomainError::store_unavailable(format!(
                    "Configuration file not found: {}",
                    self.path.display()
                )),
                _ => DomainError::store_unavailable(format!(
                    "Failed to read configuration file {}: {}",
                    self.path.display(),
                    e
                )),
            })?;

        serde_json::from_str(&content).map_err(|e| {
            DomainError::store_corrupt(format!(
                "Invalid configuration file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn save(&self, catalog: &DatasetCatalog) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| DomainError::internal(format!("Failed to serialize catalog: {}", e)))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, json.as_bytes()))
            .await
            .map_err(|e| DomainError::internal(format!("Catalog write task failed: {}", e)))??;

        debug!(path = %self.path.display(), datasets = catalog.len(), "Catalog saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
