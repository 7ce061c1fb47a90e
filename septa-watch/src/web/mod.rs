//! Web surface for the presentation shell.
//!
//! Serves the search window as a single HTML page plus JSON endpoints
//! mirroring the client operations.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
