//! SEPTA Regional Rail API client.
//!
//! This module provides an HTTP client for SEPTA's public JSON endpoints
//! (NextToArrive, TrainView and the station Arrivals board).
//!
//! Key characteristics of the API:
//! - No authentication, no versioning, no published schema
//! - Success is a JSON array of flat objects; failure is sometimes an
//!   object with an `error` key and a `200` status
//! - Field presence varies per train, so records stay loosely typed

mod client;
mod enhance;
mod error;
pub mod format;
pub mod mock;
mod types;

pub use client::{
    HttpTransport, Query, RawResponse, SeptaClient, SeptaConfig, Transport, arrivals_only,
    next_to_arrive_query, parse_records, station_query,
};
pub use enhance::enrich_with_live;
pub use error::{ErrorKind, SeptaError};
pub use format::format_schedule;
pub use mock::MockTransport;
pub use types::{Direction, Endpoint, ParseDirectionError, TrainRecord, field};
