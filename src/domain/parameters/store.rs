//! Document store trait and the parameter write policy

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Untyped document body
pub type Document = Map<String, Value>;

/// External document database addressed by collection and id
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError>;

    /// Create or fully overwrite a document
    async fn set_document(&self, collection: &str, id: &str, document: Document) -> Result<(), DomainError>;

    /// Backend name for logs and error messages
    fn backend(&self) -> &'static str;
}

/// Outcome of planning a parameter write
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    /// Document to store and return
    pub document: Document,
    /// Whether the write is reported as a creation
    pub created: bool,
}

/// Decide what to store for an incoming partial document.
///
/// - No existing document: store `incoming` as is, reported as created.
/// - Incoming fields are a subset of the existing fields: merge with incoming
///   values winning, reported as created.
/// - Otherwise: replace with `incoming`, reported as not created.
pub fn plan_document_write(existing: Option<&Document>, incoming: Document) -> DocumentWrite {
    let Some(existing) = existing else {
        return DocumentWrite {
            document: incoming,
            created: true,
        };
    };

    let is_subset = incoming.keys().all(|k| existing.contains_key(k));

    if is_subset {
        let mut merged = existing.clone();
        for (key, value) in incoming {
            merged.insert(key, value);
        }
        DocumentWrite {
            document: merged,
            created: true,
        }
    } else {
        DocumentWrite {
            document: incoming,
            created: false,
        }
    }
}
