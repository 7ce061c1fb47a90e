//! Configuration for the presentation shell.

use std::time::Duration;

use crate::stations::{DEFAULT_DESTINATION, DEFAULT_ORIGIN, DEFAULT_RESULT_COUNT};

/// Default auto-refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration parameters for the shell.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Period between auto-refresh searches.
    pub refresh_interval: Duration,

    /// Origin selected when the shell starts.
    pub origin: String,

    /// Destination selected when the shell starts.
    pub destination: String,

    /// Result count selected when the shell starts.
    pub count: u32,
}

impl ShellConfig {
    /// Set the auto-refresh period.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the initial route selection.
    pub fn with_selection(
        mut self,
        origin: impl Into<String>,
        destination: impl Into<String>,
        count: u32,
    ) -> Self {
        self.origin = origin.into();
        self.destination = destination.into();
        self.count = count;
        self
    }

    /// Auto-refresh period in whole seconds, for status messages.
    pub fn refresh_secs(&self) -> u64 {
        self.refresh_interval.as_secs()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            origin: DEFAULT_ORIGIN.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
            count: DEFAULT_RESULT_COUNT,
        }
    }
}
