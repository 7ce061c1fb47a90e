//! Application state for the web layer.

use crate::septa::SeptaClient;
use crate::shell::Shell;

/// Shared application state.
///
/// The shell is the one window every browser tab looks at.
#[derive(Clone)]
pub struct AppState {
    /// Search window state and auto-refresh timer
    pub shell: Shell,
}

impl AppState {
    /// Create a new app state.
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    /// Client used by the shell, for the JSON passthrough endpoints.
    pub fn client(&self) -> &SeptaClient {
        self.shell.client()
    }
}
