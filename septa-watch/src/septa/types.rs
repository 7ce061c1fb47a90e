//! Wire types for the SEPTA JSON endpoints.
//!
//! SEPTA publishes no schema and field presence varies between endpoints
//! and between trains, so a record is kept as the flat JSON object it
//! arrived as. Accessors read fields defensively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names used by the client and the shell.
pub mod field {
    pub const TRAIN_ID: &str = "train_id";
    pub const ORIGIN: &str = "origin";
    pub const DESTINATION: &str = "destination";
    pub const DEPARTURE_TIME: &str = "departure_time";
    pub const ARRIVAL_TIME: &str = "arrival_time";
    pub const DELAY: &str = "delay";
    pub const STATUS: &str = "status";
    pub const CURRENT_STATUS: &str = "current_status";
    pub const CURRENT_LOCATION: &str = "current_location";
    pub const IS_LATE: &str = "is_late";
}

/// One row of schedule or status data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainRecord(Map<String, Value>);

impl TrainRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw JSON value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Field rendered as display text.
    ///
    /// Strings come back as-is, numbers and booleans in their JSON form.
    /// `null`, arrays and objects count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Field rendered as display text, or `"Unknown"`.
    pub fn text_or_unknown(&self, name: &str) -> String {
        self.text(name).unwrap_or_else(|| "Unknown".to_string())
    }

    /// Whether the field is present and carries something.
    ///
    /// `null`, `""`, `false`, `0` and empty containers all count as empty.
    pub fn has_value(&self, name: &str) -> bool {
        match self.0.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }

    /// Train identifier, normalised to text so `"123"` and `123` agree.
    pub fn train_id(&self) -> Option<String> {
        self.text(field::TRAIN_ID)
    }

    pub fn has_arrival_time(&self) -> bool {
        self.has_value(field::ARRIVAL_TIME)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for TrainRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Direction of travel for station boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl Direction {
    /// Code used in the `direction` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unrecognised direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0:?}: expected N or S")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "northbound" => Ok(Direction::North),
            "s" | "south" | "southbound" => Ok(Direction::South),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// The SEPTA endpoints this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    NextToArrive,
    TrainView,
    ArrivalsDepartures,
    Arrivals,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::NextToArrive,
        Endpoint::TrainView,
        Endpoint::ArrivalsDepartures,
        Endpoint::Arrivals,
    ];

    /// Path relative to the API base URL.
    ///
    /// Both station-board endpoints are served by the same script.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::NextToArrive => "NextToArrive/index.php",
            Endpoint::TrainView => "TrainView/index.php",
            Endpoint::ArrivalsDepartures | Endpoint::Arrivals => "Arrivals/index.php",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::NextToArrive => "NextToArrive",
            Endpoint::TrainView => "TrainView",
            Endpoint::ArrivalsDepartures => "ArrivalsDepartures",
            Endpoint::Arrivals => "Arrivals",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
