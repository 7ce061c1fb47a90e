//! SEPTA client error types.

use std::fmt;

/// The three ways a request to a SEPTA endpoint can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure, timeout, or non-2xx status.
    Network,
    /// The body was not JSON, or not a list of objects.
    Decode,
    /// The API answered with an object carrying an `error` key.
    Upstream,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Decode => "decode",
            ErrorKind::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the SEPTA HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum SeptaError {
    /// Request never produced a response (connection refused, timeout, ...)
    #[error("network error: {message}")]
    Network { message: String },

    /// Endpoint answered with a non-2xx status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not JSON of the expected shape
    #[error("JSON decode error: {message}")]
    Decode {
        message: String,
        body: Option<String>,
    },

    /// Body was a JSON object signalling an API-side error
    #[error("SEPTA API error: {message}")]
    Upstream { message: String },

    /// Client could not be built from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl SeptaError {
    /// Classify this error into the network/decode/upstream taxonomy.
    ///
    /// Configuration errors happen before any request is made and are
    /// reported as network failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeptaError::Network { .. } | SeptaError::Status { .. } | SeptaError::Config(_) => {
                ErrorKind::Network
            }
            SeptaError::Decode { .. } => ErrorKind::Decode,
            SeptaError::Upstream { .. } => ErrorKind::Upstream,
        }
    }

    pub(crate) fn decode(message: impl Into<String>, body: &str) -> Self {
        SeptaError::Decode {
            message: message.into(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

impl From<reqwest::Error> for SeptaError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SeptaError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => SeptaError::Network {
                message: err.to_string(),
            },
        }
    }
}
