//! Web layer for the fare aggregator.
//!
//! Provides JSON endpoints for listing services and comparing fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
