//! SEPTA HTTP client.
//!
//! Every public operation goes through one request helper that returns
//! either the decoded records or a [`SeptaError`] tagged with its kind.
//! Transport is pluggable so tests can substitute canned responses.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use super::enhance::enrich_with_live;
use super::error::SeptaError;
use super::types::{Direction, Endpoint, TrainRecord};

/// Default base URL for the SEPTA public API.
const DEFAULT_BASE_URL: &str = "https://www3.septa.org/api";

/// SEPTA rejects some non-browser agents, so present as one.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query string pairs for one request.
pub type Query = Vec<(&'static str, String)>;

/// Configuration for the SEPTA client.
#[derive(Debug, Clone)]
pub struct SeptaConfig {
    /// Base URL for the API (defaults to production SEPTA)
    pub base_url: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SeptaConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SeptaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Status and body of a response, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the GET for an endpoint.
///
/// Implementations report transport failures as [`SeptaError::Network`];
/// status handling and decoding happen in [`SeptaClient`].
pub trait Transport: Send + Sync {
    fn get<'a>(
        &'a self,
        endpoint: Endpoint,
        query: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<RawResponse, SeptaError>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &SeptaConfig) -> Result<Self, SeptaError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| SeptaError::Config("invalid User-Agent header".to_string()))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SeptaError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl Transport for HttpTransport {
    fn get<'a>(
        &'a self,
        endpoint: Endpoint,
        query: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<RawResponse, SeptaError>> {
        Box::pin(async move {
            let response = self.http.get(self.url(endpoint)).query(query).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(RawResponse { status, body })
        })
    }
}

/// SEPTA Regional Rail API client.
#[derive(Clone)]
pub struct SeptaClient {
    transport: Arc<dyn Transport>,
}

impl SeptaClient {
    /// Create a client that talks HTTP using the given configuration.
    pub fn new(config: SeptaConfig) -> Result<Self, SeptaError> {
        Ok(Self::with_transport(HttpTransport::new(&config)?))
    }

    /// Create a client over any transport (test doubles, recorders).
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Next trains running from `origin` to `destination`.
    pub async fn next_to_arrive(
        &self,
        origin: &str,
        destination: &str,
        count: u32,
    ) -> Result<Vec<TrainRecord>, SeptaError> {
        self.request(Endpoint::NextToArrive, next_to_arrive_query(origin, destination, count))
            .await
    }

    /// Every regional rail train currently in service.
    pub async fn train_view(&self) -> Result<Vec<TrainRecord>, SeptaError> {
        self.request(Endpoint::TrainView, Vec::new()).await
    }

    /// Arrivals and departures board for a station.
    pub async fn station_arrivals_departures(
        &self,
        station: &str,
        direction: Direction,
        count: u32,
    ) -> Result<Vec<TrainRecord>, SeptaError> {
        self.request(
            Endpoint::ArrivalsDepartures,
            station_query(station, direction, count),
        )
        .await
    }

    /// Arrivals at a station.
    ///
    /// Unless `include_departures` is set, rows without an arrival time
    /// are dropped.
    pub async fn arrivals(
        &self,
        station: &str,
        direction: Direction,
        count: u32,
        include_departures: bool,
    ) -> Result<Vec<TrainRecord>, SeptaError> {
        let records = self
            .request(Endpoint::Arrivals, station_query(station, direction, count))
            .await?;

        if include_departures {
            return Ok(records);
        }
        Ok(arrivals_only(records))
    }

    /// Next-to-arrive results enriched with live status from the train view.
    ///
    /// A failed train view only loses the enrichment; the schedule is still
    /// returned.
    pub async fn search_trains_by_route(
        &self,
        origin: &str,
        destination: &str,
        max_results: u32,
    ) -> Result<Vec<TrainRecord>, SeptaError> {
        let scheduled = self.next_to_arrive(origin, destination, max_results).await?;

        let live = match self.train_view().await {
            Ok(live) => live,
            Err(e) => {
                warn!(error = %e, "train view unavailable, skipping live status");
                Vec::new()
            }
        };

        Ok(enrich_with_live(scheduled, &live))
    }

    /// Issue a request and hand back the response untouched.
    pub async fn fetch_raw(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Result<RawResponse, SeptaError> {
        self.transport.get(endpoint, query).await
    }

    async fn request(
        &self,
        endpoint: Endpoint,
        query: Query,
    ) -> Result<Vec<TrainRecord>, SeptaError> {
        let result = match self.fetch_raw(endpoint, &query).await {
            Ok(raw) => parse_records(raw),
            Err(e) => Err(e),
        };

        match &result {
            Ok(records) => debug!(%endpoint, count = records.len(), "fetched records"),
            Err(e) => warn!(%endpoint, kind = %e.kind(), error = %e, "request failed"),
        }
        result
    }
}

/// Positional query for NextToArrive.
pub fn next_to_arrive_query(origin: &str, destination: &str, count: u32) -> Query {
    vec![
        ("req1", origin.to_string()),
        ("req2", destination.to_string()),
        ("req3", count.to_string()),
    ]
}

/// Query for the station Arrivals board.
pub fn station_query(station: &str, direction: Direction, count: u32) -> Query {
    vec![
        ("station", station.to_string()),
        ("results", count.to_string()),
        ("direction", direction.code().to_string()),
    ]
}

/// Drop rows with no arrival time.
pub fn arrivals_only(records: Vec<TrainRecord>) -> Vec<TrainRecord> {
    records
        .into_iter()
        .filter(TrainRecord::has_arrival_time)
        .collect()
}

/// Turn a raw response into records, classifying anything unexpected.
///
/// Array elements must be JSON objects; any other element is a decode error.
pub fn parse_records(raw: RawResponse) -> Result<Vec<TrainRecord>, SeptaError> {
    if !raw.is_success() {
        return Err(SeptaError::Status {
            status: raw.status,
            message: raw.body.chars().take(200).collect(),
        });
    }

    let value: Value = serde_json::from_str(&raw.body)
        .map_err(|e| SeptaError::decode(e.to_string(), &raw.body))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(fields) => Ok(TrainRecord::new(fields)),
                other => Err(SeptaError::Decode {
                    message: format!("element {i} is not an object: {other}"),
                    body: None,
                }),
            })
            .collect(),
        Value::Object(fields) if fields.contains_key("error") => {
            let message = match &fields["error"] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Err(SeptaError::Upstream { message })
        }
        _ => Err(SeptaError::decode("expected a JSON array", &raw.body)),
    }
}
