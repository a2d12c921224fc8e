//! In-memory document store

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::domain::parameters::{Document, DocumentStore};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Used when no Firestore project is configured. Data is lost when the
/// process terminates.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<(String, String), Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one document
    pub fn with_document(collection: &str, id: &str, document: Document) -> Self {
        let store = Self::new();
        if let Ok(mut documents) = store.documents.write() {
            documents.insert((collection.to_string(), id.to_string()), document);
        }
        store
    }

    /// Creates a store seeded from a JSON object file when the file exists
    pub async fn seeded_from_file(
        path: &Path,
        collection: &str,
        id: &str,
    ) -> Result<Self, DomainError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let document = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(DomainError::configuration(format!(
                    "{} must hold a JSON object",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(DomainError::configuration(format!(
                    "Invalid JSON in {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        info!(path = %path.display(), collection, id, "Seeded in-memory parameter document");
        Ok(Self::with_document(collection, id, document))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::provider("memory", format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn set_document(&self, collection: &str, id: &str, document: Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::provider("memory", format!("Failed to acquire write lock: {}", e))
        })?;

        documents.insert((collection.to_string(), id.to_string()), document);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
