//! Firestore REST document store
//!
//! Documents travel as typed `fields` maps, for example
//! `{"n_estimators": {"integerValue": "100"}}`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Map, Number, Value};
use tracing::debug;

use super::client::{failure_reason, FirebaseClient};
use crate::domain::parameters::{Document, DocumentStore};
use crate::domain::DomainError;

const BACKEND: &str = "firestore";

/// Encode a JSON value as a Firestore typed value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({"integerValue": i.to_string()}),
            None => json!({"doubleValue": n.as_f64().unwrap_or_default()}),
        },
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => {
            json!({"arrayValue": {"values": items.iter().map(encode_value).collect::<Vec<_>>()}})
        }
        Value::Object(map) => json!({"mapValue": {"fields": encode_fields(map)}}),
    }
}

/// Encode a document body as a Firestore `fields` map
pub fn encode_fields(document: &Map<String, Value>) -> Value {
    Value::Object(
        document
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Decode a Firestore typed value
pub fn decode_value(value: &Value) -> Result<Value, DomainError> {
    let unsupported = || {
        DomainError::provider(BACKEND, format!("Unsupported Firestore value: {}", value))
    };

    let object = value.as_object().ok_or_else(unsupported)?;
    let (kind, inner) = object.iter().next().ok_or_else(unsupported)?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(unsupported),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).map_err(|_| unsupported()),
            Value::Number(n) if n.is_i64() => Ok(Value::Number(n.clone())),
            _ => Err(unsupported()),
        },
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(unsupported),
        "stringValue" | "timestampValue" | "referenceValue" => {
            inner.as_str().map(|s| Value::String(s.to_string())).ok_or_else(unsupported)
        }
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(Value::Array),
        "mapValue" => decode_fields(inner.get("fields").unwrap_or(&Value::Null)).map(Value::Object),
        _ => Err(unsupported()),
    }
}

/// Decode a Firestore `fields` map; a missing map is an empty document
pub fn decode_fields(fields: &Value) -> Result<Document, DomainError> {
    match fields {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| decode_value(v).map(|decoded| (k.clone(), decoded)))
            .collect(),
        other => Err(DomainError::provider(
            BACKEND,
            format!("Unsupported Firestore fields: {}", other),
        )),
    }
}

/// Document store backed by Cloud Firestore
#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    client: Arc<FirebaseClient>,
}

impl FirestoreDocumentStore {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>, DomainError> {
        let url = self.client.document_url(collection, id);
        let response = self.client.admin_request(Method::GET, &url, None).await?;

        if response.status == 404 {
            debug!(collection, id, "Firestore document absent");
            return Ok(None);
        }

        if !response.is_success() {
            return Err(DomainError::provider(BACKEND, failure_reason(&response)));
        }

        decode_fields(response.body.get("fields").unwrap_or(&Value::Null)).map(Some)
    }

    async fn set_document(&self, collection: &str, id: &str, document: Document) -> Result<(), DomainError> {
        let url = self.client.document_url(collection, id);
        let body = json!({"fields": encode_fields(&document)});
        let response = self
            .client
            .admin_request(Method::PATCH, &url, Some(&body))
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider(BACKEND, failure_reason(&response)));
        }

        debug!(collection, id, fields = document.len(), "Firestore document written");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
