//! Model parameter document

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Strategy for the number of features considered at each split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxFeatures {
    Auto,
    Sqrt,
    Log2,
}

impl MaxFeatures {
    /// Features per split for `n_features` columns, at least one
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features.max(1) as f64;
        let m = match self {
            Self::Auto | Self::Sqrt => n.sqrt(),
            Self::Log2 => n.log2(),
        };
        (m.floor() as usize).max(1)
    }
}

/// Split quality measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Gini,
    Entropy,
}

/// Optional overrides for the random forest.
///
/// Only fields that were set are serialized, so a stored document records
/// overrides and nothing else. Integer fields accept numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Number of trees in the forest (1..=1000)
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub n_estimators: Option<i64>,

    /// Maximum depth of each tree; unset means unlimited
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<i64>,

    /// Minimum samples required to split an internal node
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_samples_split: Option<i64>,

    /// Minimum samples required at a leaf
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub min_samples_leaf: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_features: Option<MaxFeatures>,

    /// Maximum leaf nodes per tree; unset means unlimited
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub max_leaf_nodes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion: Option<Criterion>,
}

impl ModelParameters {
    /// Parse from an untyped document, ignoring null fields
    pub fn from_document(document: &Map<String, Value>) -> Result<Self, DomainError> {
        let set_fields: Map<String, Value> = document
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        serde_json::from_value(Value::Object(set_fields))
            .map_err(|e| DomainError::validation(format!("Invalid parameter document: {}", e)))
    }

    /// Only the explicitly set fields, in declaration order
    pub fn to_document(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Float(v)) if v.fract() == 0.0 && v.is_finite() => Ok(Some(v as i64)),
        Some(Raw::Float(v)) => Err(serde::de::Error::custom(format!(
            "value is not a valid integer: {}",
            v
        ))),
        Some(Raw::Text(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("value is not a valid integer: {:?}", s))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_parameters_serialize_to_nothing() {
        let params = ModelParameters::default();
        assert!(params.to_document().is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let params: ModelParameters = serde_json::from_value(json!({
            "n_estimators": "499",
            "min_samples_split": "499",
            "min_samples_leaf": "499",
        }))
        .unwrap();

        assert_eq!(params.n_estimators, Some(499));
        assert_eq!(params.min_samples_split, Some(499));
        assert_eq!(params.min_samples_leaf, Some(499));
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        let result = serde_json::from_value::<ModelParameters>(json!({"n_estimators": "many"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_enum_fields() {
        for (raw, expected) in [("auto", MaxFeatures::Auto), ("sqrt", MaxFeatures::Sqrt), ("log2", MaxFeatures::Log2)] {
            let params: ModelParameters = serde_json::from_value(json!({"max_features": raw})).unwrap();
            assert_eq!(params.max_features, Some(expected));
        }

        let params: ModelParameters = serde_json::from_value(json!({"criterion": "entropy"})).unwrap();
        assert_eq!(params.criterion, Some(Criterion::Entropy));

        assert!(serde_json::from_value::<ModelParameters>(json!({"criterion": "invalid_option"})).is_err());
        assert!(serde_json::from_value::<ModelParameters>(json!({"max_features": "invalid_option"})).is_err());
    }

    #[test]
    fn test_document_keeps_only_set_fields() {
        let params: ModelParameters = serde_json::from_value(json!({
            "n_estimators": 100,
            "min_samples_split": 2,
            "min_samples_leaf": 1,
        }))
        .unwrap();

        let document = params.to_document();
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["n_estimators", "min_samples_split", "min_samples_leaf"]);
    }

    #[test]
    fn test_from_document_ignores_nulls() {
        let document = json!({"n_estimators": 100, "max_depth": null, "criterion": "gini"});
        let params = ModelParameters::from_document(document.as_object().unwrap()).unwrap();

        assert_eq!(params.n_estimators, Some(100));
        assert_eq!(params.max_depth, None);
        assert_eq!(params.criterion, Some(Criterion::Gini));
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(5), 2);
        assert_eq!(MaxFeatures::Auto.resolve(16), 4);
        assert_eq!(MaxFeatures::Log2.resolve(5), 2);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
    }
}
