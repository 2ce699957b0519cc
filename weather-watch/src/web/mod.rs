//! JSON HTTP surface over the decision engine.
//!
//! Exposes rain and freeze checks for a location, the candidate station
//! set, and a way to force a station catalog refetch.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
