//! Web layer for the journey server.
//!
//! A thin JSON surface over the enrichment pipeline and the pinned-journey
//! tracker.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
