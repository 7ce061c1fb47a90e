//! Mock SEPTA transport for testing without network access.
//!
//! Serves canned bodies per endpoint and records every request it sees.
//! Canned responses can be loaded from a directory of JSON files and
//! changed while the mock is in use.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;

use super::client::{RawResponse, Transport};
use super::error::SeptaError;
use super::types::Endpoint;

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone)]
enum Reply {
    Response(RawResponse),
    NetworkError(String),
}

#[derive(Debug, Clone)]
struct Canned {
    reply: Reply,
    delay: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    canned: HashMap<Endpoint, Canned>,
    requests: Vec<RecordedRequest>,
}

/// Fake transport serving canned responses.
///
/// Endpoints without a canned response answer `404`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load canned bodies from `{Endpoint}.json` files in a directory.
    ///
    /// Expects files like `NextToArrive.json` and `TrainView.json`; missing
    /// endpoints are left unconfigured.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, SeptaError> {
        let data_dir = data_dir.as_ref();
        let mock = Self::new();
        let mut loaded = 0;

        for endpoint in Endpoint::ALL {
            let path = data_dir.join(format!("{}.json", endpoint.name()));
            if !path.is_file() {
                continue;
            }
            let body = std::fs::read_to_string(&path).map_err(|e| {
                SeptaError::Config(format!("failed to read {}: {e}", path.display()))
            })?;
            mock.set_body(endpoint, body);
            loaded += 1;
        }

        if loaded == 0 {
            return Err(SeptaError::Config(format!(
                "no mock response files found in {}",
                data_dir.display()
            )));
        }
        Ok(mock)
    }

    pub fn with_body(self, endpoint: Endpoint, body: impl Into<String>) -> Self {
        self.set_body(endpoint, body);
        self
    }

    pub fn with_status(self, endpoint: Endpoint, status: u16, body: impl Into<String>) -> Self {
        self.set_reply(
            endpoint,
            Reply::Response(RawResponse {
                status,
                body: body.into(),
            }),
        );
        self
    }

    pub fn with_network_error(self, endpoint: Endpoint, message: impl Into<String>) -> Self {
        self.set_reply(endpoint, Reply::NetworkError(message.into()));
        self
    }

    pub fn with_delay(self, endpoint: Endpoint, delay: Duration) -> Self {
        self.set_delay(endpoint, delay);
        self
    }

    /// Replace the `200` body served for an endpoint.
    pub fn set_body(&self, endpoint: Endpoint, body: impl Into<String>) {
        self.set_reply(endpoint, Reply::Response(RawResponse::ok(body)));
    }

    /// Delay every later response from an endpoint.
    pub fn set_delay(&self, endpoint: Endpoint, delay: Duration) {
        let mut inner = self.lock();
        let canned = inner.canned.entry(endpoint).or_insert_with(|| Canned {
            reply: not_found(endpoint),
            delay,
        });
        canned.delay = delay;
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received for one endpoint.
    pub fn request_count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    fn set_reply(&self, endpoint: Endpoint, reply: Reply) {
        let mut inner = self.lock();
        let delay = inner
            .canned
            .get(&endpoint)
            .map(|c| c.delay)
            .unwrap_or_default();
        inner.canned.insert(endpoint, Canned { reply, delay });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Ignore poisoning from a panicked holder.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn not_found(endpoint: Endpoint) -> Reply {
    Reply::Response(RawResponse {
        status: 404,
        body: format!("no mock data for {endpoint}"),
    })
}

impl Transport for MockTransport {
    fn get<'a>(
        &'a self,
        endpoint: Endpoint,
        query: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<RawResponse, SeptaError>> {
        // Reply is fixed at request time, so later reconfiguration does
        // not affect requests already in flight.
        let canned = {
            let mut inner = self.lock();
            inner.requests.push(RecordedRequest {
                endpoint,
                query: query.to_vec(),
            });
            inner.canned.get(&endpoint).cloned().unwrap_or(Canned {
                reply: not_found(endpoint),
                delay: Duration::ZERO,
            })
        };

        Box::pin(async move {
            if !canned.delay.is_zero() {
                tokio::time::sleep(canned.delay).await;
            }
            match canned.reply {
                Reply::Response(raw) => Ok(raw),
                Reply::NetworkError(message) => Err(SeptaError::Network { message }),
            }
        })
    }
}
