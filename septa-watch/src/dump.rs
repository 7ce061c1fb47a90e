//! Debug dumps of SEPTA responses.
//!
//! Writes what the API sent to timestamped files so unexpected payloads
//! can be inspected offline. Diagnostic only; nothing reads these back.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::septa::{Endpoint, RawResponse, SeptaClient, SeptaError, TrainRecord, parse_records};

/// Default directory for dump files.
pub const DEFAULT_DUMP_DIR: &str = "test_output";

/// Errors writing dump files.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("failed to create dump directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize dump: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One fetched response and the file it was written to.
#[derive(Debug)]
pub struct Capture {
    pub path: PathBuf,
    pub response: Result<RawResponse, SeptaError>,
}

impl Capture {
    /// Decode the captured response without fetching again.
    pub fn records(self) -> Result<Vec<TrainRecord>, SeptaError> {
        parse_records(self.response?)
    }
}

/// Writes `{dir}/{YYYYmmdd_HHMMSS}_{name}.json` files.
#[derive(Debug, Clone)]
pub struct DumpWriter {
    dir: PathBuf,
}

impl DumpWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` byte for byte.
    pub fn write_raw(&self, name: &str, contents: &str) -> Result<PathBuf, DumpError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| DumpError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.dir.join(format!("{timestamp}_{name}.json"));
        std::fs::write(&path, contents).map_err(|source| DumpError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "raw data saved");
        Ok(path)
    }

    /// Write `value` as pretty-printed JSON.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<PathBuf, DumpError> {
        let contents = serde_json::to_string_pretty(value)?;
        self.write_raw(name, &contents)
    }

    /// Fetch an endpoint once and dump whatever came back.
    ///
    /// Bodies are written verbatim whatever their status; transport failures
    /// are written as an error object. The response is handed back so the
    /// caller can decode the same bytes that were saved.
    pub async fn capture(
        &self,
        client: &SeptaClient,
        name: &str,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<Capture, DumpError> {
        let response = client.fetch_raw(endpoint, query).await;
        let path = match &response {
            Ok(raw) => self.write_raw(name, &raw.body)?,
            Err(e) => {
                let record = error_record(endpoint, query, e);
                self.write_json(&format!("{name}_error"), &record)?
            }
        };
        Ok(Capture { path, response })
    }
}

impl Default for DumpWriter {
    fn default() -> Self {
        Self::new(DEFAULT_DUMP_DIR)
    }
}

fn error_record(
    endpoint: Endpoint,
    query: &[(&'static str, String)],
    error: &SeptaError,
) -> serde_json::Value {
    let query: serde_json::Map<String, serde_json::Value> = query
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect();
    json!({
        "endpoint": endpoint.name(),
        "query": query,
        "error": error.to_string(),
        "kind": error.kind().as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::septa::MockTransport;
    use tempfile::tempdir;

    fn file_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    #[test]
    fn raw_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let writer = DumpWriter::new(dir.path().join("nested"));

        let body = "[ {\"train_id\" : \"1\"} ]";
        let path = writer.write_raw("train_view", body).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
        let name = file_name(&path);
        assert!(name.ends_with("_train_view.json"));
        // YYYYmmdd_HHMMSS_
        assert_eq!(name.find("_train_view"), Some(15));
    }

    #[test]
    fn json_is_pretty() {
        let dir = tempdir().unwrap();
        let writer = DumpWriter::new(dir.path());

        let path = writer.write_json("list", &vec![1, 2]).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains('\n'));
        assert_eq!(serde_json::from_str::<Vec<i32>>(&contents).unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn capture_records_body_and_errors() {
        let dir = tempdir().unwrap();
        let writer = DumpWriter::new(dir.path());
        let mock = MockTransport::new()
            .with_body(Endpoint::TrainView, "not even json")
            .with_network_error(Endpoint::NextToArrive, "timed out");
        let client = SeptaClient::with_transport(mock);

        let capture = writer
            .capture(&client, "train_view", Endpoint::TrainView, &[])
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&capture.path).unwrap(), "not even json");
        assert!(capture.records().is_err());

        let query = vec![("req1", "Paoli".to_string())];
        let capture = writer
            .capture(&client, "nta", Endpoint::NextToArrive, &query)
            .await
            .unwrap();
        assert!(file_name(&capture.path).ends_with("_nta_error.json"));

        let record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&capture.path).unwrap()).unwrap();
        assert_eq!(record["endpoint"], "NextToArrive");
        assert_eq!(record["query"]["req1"], "Paoli");
        assert_eq!(record["kind"], "network");
    }

    #[tokio::test]
    async fn capture_fetches_once_and_decodes_saved_body() {
        let dir = tempdir().unwrap();
        let writer = DumpWriter::new(dir.path());
        let mock = MockTransport::new()
            .with_body(Endpoint::Arrivals, r#"[{"train_id":"1","arrival_time":"10:00"}]"#);
        let client = SeptaClient::with_transport(mock.clone());

        let capture = writer
            .capture(&client, "arrivals", Endpoint::Arrivals, &[])
            .await
            .unwrap();
        let saved = std::fs::read_to_string(&capture.path).unwrap();
        let records = capture.records().unwrap();

        assert_eq!(mock.request_count(Endpoint::Arrivals), 1);
        assert_eq!(records, serde_json::from_str::<Vec<TrainRecord>>(&saved).unwrap());
        assert_eq!(records[0].train_id().as_deref(), Some("1"));
    }
}
