//! In-memory copy of the dataset configuration document

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::DatasetRecord;

/// Ordered mapping from dataset name to record
///
/// Backed by the JSON object itself (`preserve_order`), so entry order is
/// kept as read from disk and new names are appended. Entries this service
/// did not write keep any extra fields they carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DatasetCatalog {
    entries: Map<String, Value>,
}

impl DatasetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<DatasetRecord> {
        self.entries.get(name).and_then(decode)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or replace the record stored under its name, keeping its position.
    /// Returns the previous record, if any.
    pub fn insert(&mut self, record: DatasetRecord) -> Option<DatasetRecord> {
        let value = json!({ "name": record.name, "url": record.url });
        self.entries
            .insert(record.name, value)
            .as_ref()
            .and_then(decode)
    }

    pub fn remove(&mut self, name: &str) -> Option<DatasetRecord> {
        self.entries.shift_remove(name).as_ref().and_then(decode)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(value: &Value) -> Option<DatasetRecord> {
    DatasetRecord::deserialize(value).ok()
}

impl FromIterator<DatasetRecord> for DatasetCatalog {
    fn from_iter<I: IntoIterator<Item = DatasetRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

impl<'de> Deserialize<'de> for DatasetCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Map::<String, Value>::deserialize(deserializer)?;

        for value in entries.values() {
            DatasetRecord::deserialize(value).map_err(D::Error::custom)?;
        }

        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_replace() {
        let mut catalog = DatasetCatalog::new();
        assert!(catalog.insert(DatasetRecord::new("iris", "https://a.fr/")).is_none());

        let previous = catalog.insert(DatasetRecord::new("iris", "https://b.fr/"));
        assert_eq!(previous.unwrap().url, "https://a.fr/");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("iris").unwrap().url, "https://b.fr/");
    }

    #[test]
    fn test_remove() {
        let mut catalog: DatasetCatalog = [DatasetRecord::new("a", "https://a.fr/")]
            .into_iter()
            .collect();

        assert!(catalog.remove("missing").is_none());
        assert!(catalog.remove("a").is_some());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_json_keeps_key_order() {
        let json = r#"{"zeta":{"name":"zeta","url":"https://z.fr/"},"alpha":{"name":"alpha","url":"https://a.fr/"}}"#;
        let mut catalog: DatasetCatalog = serde_json::from_str(json).unwrap();
        catalog.insert(DatasetRecord::new("mid", "https://m.fr/"));

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let written = serde_json::to_string(&catalog).unwrap();
        let zeta = written.find("zeta").unwrap();
        let alpha = written.find("alpha").unwrap();
        let mid = written.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut catalog: DatasetCatalog = [
            DatasetRecord::new("a", "https://a.fr/"),
            DatasetRecord::new("b", "https://b.fr/"),
            DatasetRecord::new("c", "https://c.fr/"),
        ]
        .into_iter()
        .collect();

        catalog.insert(DatasetRecord::new("a", "https://a2.fr/"));
        catalog.remove("b");

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(catalog.get("a").unwrap().url, "https://a2.fr/");
    }

    #[test]
    fn test_untouched_entries_keep_extra_fields() {
        let json = r#"{"iris":{"name":"iris","url":"https://i.fr/","source":"kaggle"}}"#;
        let mut catalog: DatasetCatalog = serde_json::from_str(json).unwrap();
        catalog.insert(DatasetRecord::new("wine", "https://w.fr/"));

        let written = serde_json::to_value(&catalog).unwrap();
        assert_eq!(written["iris"]["source"], "kaggle");
        assert_eq!(catalog.get("iris").unwrap(), DatasetRecord::new("iris", "https://i.fr/"));
    }

    #[test]
    fn test_json_rejects_malformed_record() {
        let json = r#"{"iris":{"name":"iris"}}"#;
        assert!(serde_json::from_str::<DatasetCatalog>(json).is_err());
    }
}
