//! Shell state: route selection, search phase and rendered output.

use std::fmt;

use serde::Serialize;

/// Identifies one dispatched search. Later searches get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Route the user has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub origin: String,
    pub destination: String,
    pub count: u32,
}

/// Selection rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Error: Please select different stations for departure and arrival.")]
    SameStation,
}

impl Selection {
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.origin == self.destination {
            return Err(SelectionError::SameStation);
        }
        Ok(())
    }
}

/// Where the current search stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching { token: RequestToken },
    Success { count: usize },
    Failed { message: String },
}

impl SearchPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Searching { .. } => "searching",
            SearchPhase::Success { .. } => "success",
            SearchPhase::Failed { .. } => "failed",
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, SearchPhase::Searching { .. })
    }
}

/// Mutable shell state, guarded by the shell's lock.
#[derive(Debug, Clone)]
pub(crate) struct ShellState {
    pub selection: Selection,
    pub phase: SearchPhase,
    pub output: String,
    pub status: String,
    pub auto_refresh: bool,
    /// Token of the most recently dispatched search.
    pub latest: RequestToken,
}

impl ShellState {
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            phase: SearchPhase::Idle,
            output: String::new(),
            status: "Ready to search for trains".to_string(),
            auto_refresh: false,
            latest: RequestToken(0),
        }
    }

    /// Allocate the token for a new search and make it the latest.
    pub fn next_token(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    pub fn view(&self) -> ShellView {
        ShellView {
            origin: self.selection.origin.clone(),
            destination: self.selection.destination.clone(),
            count: self.selection.count,
            phase: self.phase.name(),
            search_enabled: !self.phase.is_searching(),
            auto_refresh: self.auto_refresh,
            output: self.output.clone(),
            status: self.status.clone(),
        }
    }
}

/// Snapshot of everything the presentation surface shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub origin: String,
    pub destination: String,
    pub count: u32,
    pub phase: &'static str,
    pub search_enabled: bool,
    pub auto_refresh: bool,
    pub output: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(origin: &str, destination: &str) -> Selection {
        Selection {
            origin: origin.to_string(),
            destination: destination.to_string(),
            count: 10,
        }
    }

    #[test]
    fn same_station_is_rejected() {
        assert_eq!(
            selection("Paoli", "Paoli").validate(),
            Err(SelectionError::SameStation)
        );
        assert!(selection("Paoli", "Exton").validate().is_ok());
    }

    #[test]
    fn tokens_increase() {
        let mut state = ShellState::new(selection("A", "B"));
        let first = state.next_token();
        let second = state.next_token();
        assert!(second > first);
        assert_eq!(state.latest, second);
    }

    #[test]
    fn view_disables_search_while_searching() {
        let mut state = ShellState::new(selection("A", "B"));
        assert!(state.view().search_enabled);
        assert_eq!(state.view().status, "Ready to search for trains");

        let token = state.next_token();
        state.phase = SearchPhase::Searching { token };
        let view = state.view();
        assert!(!view.search_enabled);
        assert_eq!(view.phase, "searching");
    }
}
