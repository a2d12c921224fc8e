//! Dataset acquisition: local CSV files and remote zip archives

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::dataset::DatasetRecord;
use crate::domain::iris::{parse_cell, Table};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Parse CSV text with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<Table, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DomainError::data_unavailable(format!("Invalid CSV header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(parse_cell).collect::<Vec<Value>>())
                .map_err(|e| DomainError::data_unavailable(format!("Invalid CSV row: {}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Table::new(columns, rows)
}

/// Serialize a table back to CSV with a header row
pub fn write_csv(table: &Table) -> Result<Vec<u8>, DomainError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let to_error = |e: csv::Error| DomainError::internal(format!("Failed to write CSV: {}", e));

    writer.write_record(table.columns()).map_err(to_error)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(cell_text))
            .map_err(to_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| DomainError::internal(format!("Failed to write CSV: {}", e)))
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract the first `.csv` entry of a zip archive, in archive order
pub fn read_zip_csv(payload: &[u8]) -> Result<Table, DomainError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(payload))
        .map_err(|e| DomainError::invalid_source(format!("Downloaded file is not a zip archive: {}", e)))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| DomainError::invalid_source(format!("Unreadable zip entry: {}", e)))?;

        if !entry.is_file() || !entry.name().to_lowercase().ends_with(".csv") {
            continue;
        }

        debug!(entry = entry.name(), "Reading CSV entry from archive");

        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| DomainError::invalid_source(format!("Unreadable zip entry: {}", e)))?;

        return parse_csv(content.as_slice());
    }

    Err(DomainError::invalid_source("No CSV file found in the archive"))
}

/// Local CSV copy of the pipeline dataset
#[derive(Debug, Clone)]
pub struct LocalCsvSource {
    path: PathBuf,
}

impl LocalCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn fetch(&self) -> Result<Table, DomainError> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::data_unavailable(format!(
                "Dataset file {} is unavailable: {}",
                self.path.display(),
                e
            ))
        })?;

        parse_csv(content.as_slice())
    }

    /// Replace the local copy with `table`
    pub async fn store(&self, table: &Table) -> Result<(), DomainError> {
        let content = write_csv(table)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::persistence(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&self.path, content).await.map_err(|e| {
            DomainError::persistence(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        info!(path = %self.path.display(), rows = table.len(), "Dataset cached locally");
        Ok(())
    }
}

/// Zip archives downloaded from registered dataset URLs
#[derive(Debug, Clone)]
pub struct RemoteZipSource {
    http: Arc<dyn HttpClientTrait>,
}

impl RemoteZipSource {
    pub fn new(http: Arc<dyn HttpClientTrait>) -> Self {
        Self { http }
    }

    pub async fn fetch(&self, record: &DatasetRecord) -> Result<Table, DomainError> {
        info!(dataset = %record.name, url = %record.url, "Downloading dataset");

        let payload = self.http.get_bytes(&record.url).await?;

        tokio::task::spawn_blocking(move || read_zip_csv(&payload))
            .await
            .map_err(|e| DomainError::internal(format!("Archive extraction task failed: {}", e)))?
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::zip_archive;
    use super::*;
    use crate::infrastructure::http_client::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = "Id,SepalLengthCm,Species\n1,5.1,Iris-setosa\n2,7.0,Iris-versicolor\n";

    #[test]
    fn test_parse_csv_types_cells() {
        let table = parse_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.columns(), ["Id", "SepalLengthCm", "Species"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], vec![json!(1), json!(5.1), json!("Iris-setosa")]);
    }

    #[test]
    fn test_parse_csv_rejects_ragged_rows() {
        let err = parse_csv("a,b\n1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DomainError::DataUnavailable { .. }));
    }

    #[test]
    fn test_read_zip_csv_uses_first_csv_entry() {
        let archive = zip_archive(&[
            ("README.txt", "ignore me"),
            ("Iris.csv", SAMPLE),
            ("other.csv", "x\n1\n"),
        ]);

        let table = read_zip_csv(&archive).unwrap();
        assert_eq!(table.columns()[0], "Id");
    }

    #[test]
    fn test_read_zip_csv_without_csv_is_invalid_source() {
        let archive = zip_archive(&[("notes.txt", "hello")]);

        let err = read_zip_csv(&archive).unwrap_err();
        assert!(matches!(err, DomainError::InvalidSource { .. }));
    }

    #[test]
    fn test_read_zip_csv_rejects_non_zip_payload() {
        let err = read_zip_csv(b"<html>not a zip</html>").unwrap_err();
        assert!(matches!(err, DomainError::InvalidSource { .. }));
    }

    #[tokio::test]
    async fn test_local_source_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalCsvSource::new(dir.path().join("data").join("Iris.csv"));
        assert!(!source.exists().await);

        let table = parse_csv(SAMPLE.as_bytes()).unwrap();
        source.store(&table).await.unwrap();

        assert!(source.exists().await);
        assert_eq!(source.fetch().await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_local_source_missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalCsvSource::new(dir.path().join("missing.csv"));

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DomainError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_remote_source_downloads_archive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/iris.zip"))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(zip_archive(&[("Iris.csv", SAMPLE)])),
            )
            .mount(&server)
            .await;

        let source = RemoteZipSource::new(Arc::new(HttpClient::new()));
        let record = DatasetRecord::new("iris", format!("{}/iris.zip", server.uri()));

        let table = source.fetch(&record).await.unwrap();
        assert_eq!(table.len(), 2);
    }
}
