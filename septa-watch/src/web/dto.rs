//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::septa::TrainRecord;

/// Search form submitted from the page.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    /// Origin station name
    pub origin: String,

    /// Destination station name
    pub destination: String,

    /// Number of results (one of the offered counts)
    pub count: u32,
}

/// Query for route-based endpoints.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Origin station name
    pub origin: String,

    /// Destination station name
    pub destination: String,

    /// Number of results (defaults to 10)
    pub count: Option<u32>,
}

/// Query for station board endpoints.
#[derive(Debug, Deserialize)]
pub struct StationQuery {
    /// Station name
    pub station: String,

    /// `N` or `S` (defaults to `N`)
    pub direction: Option<String>,

    /// Number of results (defaults to 10)
    pub count: Option<u32>,

    /// Keep rows without an arrival time (arrivals endpoint only)
    #[serde(default)]
    pub include_departures: bool,
}

/// Records returned by a client operation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsResponse {
    /// Number of records
    pub count: usize,

    /// Records exactly as the API returned them (after filtering)
    pub records: Vec<TrainRecord>,
}

impl RecordsResponse {
    pub fn new(records: Vec<TrainRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// `network`, `decode` or `upstream` for client failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn station_query_defaults() {
        let q: StationQuery = serde_json::from_value(json!({"station": "Paoli"})).unwrap();
        assert_eq!(q.station, "Paoli");
        assert!(q.direction.is_none());
        assert!(q.count.is_none());
        assert!(!q.include_departures);
    }

    #[test]
    fn records_response_counts() {
        let records: Vec<TrainRecord> =
            serde_json::from_value(json!([{"train_id": "1"}, {"train_id": "2"}])).unwrap();
        let body = serde_json::to_value(RecordsResponse::new(records)).unwrap();
        assert_eq!(body["count"], 2);
        assert_eq!(body["records"][1]["train_id"], "2");
    }

    #[test]
    fn error_response_omits_missing_kind() {
        let body = serde_json::to_value(ErrorResponse {
            error: "bad".into(),
            kind: None,
        })
        .unwrap();
        assert_eq!(body, json!({"error": "bad"}));
    }
}
