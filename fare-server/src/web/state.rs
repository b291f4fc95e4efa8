//! Application state for the web layer.

use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::config::DEFAULT_MAX_SERVICES;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Provider fan-out with its result cache
    pub aggregator: Arc<Aggregator>,

    /// Most offerings returned by one service search
    pub max_services: usize,
}

impl AppState {
    /// Create a new app state.
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            max_services: DEFAULT_MAX_SERVICES,
        }
    }

    /// Cap the number of offerings per search.
    pub fn with_max_services(mut self, max_services: usize) -> Self {
        self.max_services = max_services;
        self
    }
}
