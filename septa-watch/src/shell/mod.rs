//! Presentation shell.
//!
//! Holds what the search window shows: the selected route, the search
//! phase, the output text and the status line. Searches run on their own
//! tokio tasks so callers never wait on the network. Each search carries a
//! [`RequestToken`]; a completion that is not for the most recent token is
//! dropped, so overlapping searches cannot overwrite newer results.
//!
//! Phases per search: `Idle → Searching → (Success | Failed)`.

mod config;
mod refresh;
mod render;
mod state;

use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::septa::{SeptaClient, TrainRecord};

pub use config::{DEFAULT_REFRESH_INTERVAL, ShellConfig};
pub use render::render_records;
pub use state::{RequestToken, SearchPhase, Selection, SelectionError, ShellView};

use state::ShellState;

/// Outcome of asking the shell to search.
#[derive(Debug)]
pub enum Dispatch {
    /// Selection failed validation; nothing was sent.
    Rejected(SelectionError),
    /// A search task is running.
    Started {
        token: RequestToken,
        handle: JoinHandle<()>,
    },
}

impl Dispatch {
    pub fn token(&self) -> Option<RequestToken> {
        match self {
            Dispatch::Rejected(_) => None,
            Dispatch::Started { token, .. } => Some(*token),
        }
    }

    /// Wait for the dispatched search to finish (no-op when rejected).
    pub async fn finished(self) {
        if let Dispatch::Started { handle, .. } = self
            && let Err(e) = handle.await
        {
            warn!(error = %e, "search task did not complete");
        }
    }
}

pub(crate) struct Inner {
    client: SeptaClient,
    config: ShellConfig,
    state: RwLock<ShellState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Shared handle to the shell. Clones refer to the same window.
#[derive(Clone)]
pub struct Shell {
    inner: Arc<Inner>,
}

enum Outcome {
    Records(Vec<TrainRecord>),
    Failed(String),
}

impl Shell {
    pub fn new(client: SeptaClient, config: ShellConfig) -> Self {
        let selection = Selection {
            origin: config.origin.clone(),
            destination: config.destination.clone(),
            count: config.count,
        };
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                state: RwLock::new(ShellState::new(selection)),
                ticker: Mutex::new(None),
            }),
        }
    }

    /// Current contents of the window.
    pub async fn view(&self) -> ShellView {
        self.inner.state.read().await.view()
    }

    pub async fn selection(&self) -> Selection {
        self.inner.state.read().await.selection.clone()
    }

    /// Change the selected route. Takes effect on the next search.
    pub async fn select(&self, selection: Selection) {
        self.inner.state.write().await.selection = selection;
    }

    /// Search for the selected route.
    ///
    /// Identical origin and destination are rejected with a message in the
    /// output region. Otherwise the shell enters `Searching` and the fetch
    /// runs on a spawned task.
    pub async fn search(&self) -> Dispatch {
        let (token, selection) = {
            let mut state = self.inner.state.write().await;
            let selection = state.selection.clone();

            if let Err(e) = selection.validate() {
                // Supersede any search still in flight.
                state.next_token();
                state.output = e.to_string();
                state.status = "Select two different stations".to_string();
                state.phase = SearchPhase::Failed {
                    message: e.to_string(),
                };
                return Dispatch::Rejected(e);
            }

            let token = state.next_token();
            state.phase = SearchPhase::Searching { token };
            state.status = format!(
                "Searching for trains from {} to {}...",
                selection.origin, selection.destination
            );
            (token, selection)
        };

        debug!(
            %token,
            origin = %selection.origin,
            destination = %selection.destination,
            "dispatching search"
        );
        let shell = self.clone();
        let handle = tokio::spawn(async move { shell.run_search(token, selection).await });
        Dispatch::Started { token, handle }
    }

    async fn run_search(&self, token: RequestToken, selection: Selection) {
        let client = self.inner.client.clone();
        let query = selection.clone();
        let worker = tokio::spawn(async move {
            client
                .search_trains_by_route(&query.origin, &query.destination, query.count)
                .await
        });

        let outcome = match worker.await {
            Ok(Ok(records)) => Outcome::Records(records),
            Ok(Err(e)) => Outcome::Failed(e.to_string()),
            Err(e) => Outcome::Failed(format!("search worker failed: {e}")),
        };

        self.complete(token, &selection, outcome).await;
    }

    /// Render a finished search unless a newer one has been dispatched.
    async fn complete(&self, token: RequestToken, selection: &Selection, outcome: Outcome) -> bool {
        let mut state = self.inner.state.write().await;
        if token != state.latest {
            debug!(%token, latest = %state.latest, "discarding stale search result");
            return false;
        }

        match outcome {
            Outcome::Records(records) if records.is_empty() => {
                state.phase = SearchPhase::Success { count: 0 };
                state.output = render::NO_TRAINS_OUTPUT.to_string();
                state.status = "No trains found".to_string();
            }
            Outcome::Records(records) => {
                let updated = Local::now().format("%H:%M:%S").to_string();
                state.phase = SearchPhase::Success {
                    count: records.len(),
                };
                state.output =
                    render_records(&selection.origin, &selection.destination, &records);
                state.status = render::success_status(records.len(), &updated);
                info!(%token, count = records.len(), "search complete");
            }
            Outcome::Failed(message) => {
                state.output = render::failure_output(&message);
                state.status = "Error occurred".to_string();
                state.phase = SearchPhase::Failed { message };
            }
        }
        true
    }

    /// Empty the output region.
    pub async fn clear(&self) {
        let mut state = self.inner.state.write().await;
        state.output.clear();
        state.status = "Results cleared".to_string();
        if !state.phase.is_searching() {
            state.phase = SearchPhase::Idle;
        }
    }

    pub async fn auto_refresh_enabled(&self) -> bool {
        self.inner.state.read().await.auto_refresh
    }

    /// Turn auto-refresh on or off.
    ///
    /// Turning it off stops future ticks only; a search already running
    /// still completes and renders.
    pub async fn set_auto_refresh(&self, enabled: bool) {
        let mut ticker = self.inner.ticker.lock().await;
        self.apply_auto_refresh(&mut ticker, enabled).await;
    }

    /// Start or stop the ticker. Callers hold the ticker lock throughout.
    async fn apply_auto_refresh(&self, ticker: &mut Option<JoinHandle<()>>, enabled: bool) {
        let secs = self.inner.config.refresh_secs();

        if enabled {
            if ticker.is_none() {
                *ticker = Some(refresh::spawn_ticker(
                    Arc::downgrade(&self.inner),
                    self.inner.config.refresh_interval,
                ));
                info!(interval_secs = secs, "auto-refresh enabled");
            }
        } else if let Some(handle) = ticker.take() {
            handle.abort();
            info!("auto-refresh disabled");
        }

        let mut state = self.inner.state.write().await;
        state.auto_refresh = enabled;
        state.status = if enabled {
            format!("Auto-refresh enabled - searching every {secs} seconds")
        } else {
            "Auto-refresh disabled".to_string()
        };
    }

    /// Flip auto-refresh and return the new setting.
    pub async fn toggle_auto_refresh(&self) -> bool {
        let mut ticker = self.inner.ticker.lock().await;
        let enabled = !self.inner.state.read().await.auto_refresh;
        self.apply_auto_refresh(&mut ticker, enabled).await;
        enabled
    }

    /// Stop the auto-refresh ticker, if running.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.inner.ticker.lock().await.take() {
            handle.abort();
        }
    }

    pub fn client(&self) -> &SeptaClient {
        &self.inner.client
    }

    /// Auto-refresh period in seconds.
    pub fn refresh_secs(&self) -> u64 {
        self.inner.config.refresh_secs()
    }
}
