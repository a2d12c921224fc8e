//! Parameter service - the hyperparameter document used for training

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::parameters::{
    plan_document_write, validate_model_parameters, Document, DocumentStore, ModelParameters,
};
use crate::domain::DomainError;

/// Result of storing parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterWrite {
    pub document: Document,
    pub created: bool,
}

/// Reads and writes one parameter document in a document store
#[derive(Clone)]
pub struct ParameterService {
    store: Arc<dyn DocumentStore>,
    collection: String,
    document_id: String,
}

impl std::fmt::Debug for ParameterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterService")
            .field("backend", &self.store.backend())
            .field("collection", &self.collection)
            .field("document_id", &self.document_id)
            .finish()
    }
}

impl ParameterService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// The stored parameters; `NotFound` when no document exists
    pub async fn get(&self) -> Result<ModelParameters, DomainError> {
        self.fetch().await?.ok_or_else(|| {
            DomainError::not_found(format!(
                "No document found at {} with the id {}",
                self.collection, self.document_id
            ))
        })
    }

    /// The stored parameters, or all defaults when no document exists
    pub async fn for_training(&self) -> Result<ModelParameters, DomainError> {
        let params = self.fetch().await?.unwrap_or_default();
        debug!(?params, "Training parameters resolved");
        Ok(params)
    }

    /// Validate then store `params`, merging or replacing the existing document
    pub async fn put(&self, params: ModelParameters) -> Result<ParameterWrite, DomainError> {
        validate_model_parameters(&params)?;

        let existing = self
            .store
            .get_document(&self.collection, &self.document_id)
            .await?;
        let plan = plan_document_write(existing.as_ref(), params.to_document());

        self.store
            .set_document(&self.collection, &self.document_id, plan.document.clone())
            .await?;

        info!(
            backend = self.store.backend(),
            fields = plan.document.len(),
            created = plan.created,
            "Parameters stored"
        );

        Ok(ParameterWrite {
            document: plan.document,
            created: plan.created,
        })
    }

    async fn fetch(&self) -> Result<Option<ModelParameters>, DomainError> {
        self.store
            .get_document(&self.collection, &self.document_id)
            .await?
            .map(|document| ModelParameters::from_document(&document))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::{Criterion, MockDocumentStore};
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn service(store: MockDocumentStore) -> ParameterService {
        ParameterService::new(Arc::new(store), "parameters", "parameters")
    }

    #[tokio::test]
    async fn test_get_missing_document_is_not_found() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|_, _| Ok(None));

        let err = service(store).get().await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_ignores_null_fields() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .returning(|_, _| Ok(Some(doc(json!({"n_estimators": 100, "max_depth": null})))));

        let params = service(store).get().await.unwrap();
        assert_eq!(params.n_estimators, Some(100));
        assert_eq!(params.max_depth, None);
    }

    #[tokio::test]
    async fn test_training_defaults_when_absent() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|_, _| Ok(None));

        let params = service(store).for_training().await.unwrap();
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_put_into_empty_store_is_created() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().returning(|_, _| Ok(None));
        store
            .expect_set_document()
            .withf(|collection, id, document| {
                collection == "parameters" && id == "parameters" && document.len() == 3
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store.expect_backend().return_const("mock");

        let params = ModelParameters {
            n_estimators: Some(100),
            min_samples_split: Some(2),
            min_samples_leaf: Some(1),
            ..Default::default()
        };

        let write = service(store).put(params).await.unwrap();
        assert!(write.created);
        assert_eq!(
            Value::Object(write.document),
            json!({"n_estimators": 100, "min_samples_split": 2, "min_samples_leaf": 1})
        );
    }

    #[tokio::test]
    async fn test_put_subset_merges() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .returning(|_, _| Ok(Some(doc(json!({"n_estimators": 100, "criterion": "gini"})))));
        store.expect_set_document().returning(|_, _, _| Ok(()));
        store.expect_backend().return_const("mock");

        let params = ModelParameters {
            criterion: Some(Criterion::Entropy),
            ..Default::default()
        };

        let write = service(store).put(params).await.unwrap();
        assert!(write.created);
        assert_eq!(
            Value::Object(write.document),
            json!({"n_estimators": 100, "criterion": "entropy"})
        );
    }

    #[tokio::test]
    async fn test_put_new_fields_replaces() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .returning(|_, _| Ok(Some(doc(json!({"n_estimators": 100})))));
        store.expect_set_document().returning(|_, _, _| Ok(()));
        store.expect_backend().return_const("mock");

        let params = ModelParameters {
            max_depth: Some(4),
            ..Default::default()
        };

        let write = service(store).put(params).await.unwrap();
        assert!(!write.created);
        assert_eq!(Value::Object(write.document), json!({"max_depth": 4}));
    }

    #[tokio::test]
    async fn test_put_invalid_never_touches_store() {
        let mut store = MockDocumentStore::new();
        store.expect_get_document().never();
        store.expect_set_document().never();

        let params = ModelParameters {
            n_estimators: Some(1001),
            ..Default::default()
        };

        let err = service(store).put(params).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
