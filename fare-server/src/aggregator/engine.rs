//! Fan-out to every provider and merge whatever comes back.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, ResultCache};
use crate::domain::{DateError, InvalidCity, Route, TravelDate};
use crate::providers::{FareProvider, ProviderError, ProviderResult};

use super::result::{AggregatedResult, Mode};

/// Error from an aggregation request.
///
/// Only bad caller input is an error. Provider failures are reported inside
/// the result as unavailable providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    #[error(transparent)]
    InvalidCity(#[from] InvalidCity),
}

/// Queries all providers for a route and merges their answers.
pub struct Aggregator {
    providers: Vec<Arc<dyn FareProvider>>,
    cache: Arc<ResultCache>,
}

impl Aggregator {
    /// Create an aggregator over providers in their configured order.
    pub fn new(providers: Vec<Arc<dyn FareProvider>>, cache: Arc<ResultCache>) -> Self {
        Self { providers, cache }
    }

    /// Names of the configured providers, in order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The shared result cache.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Aggregate from raw user input.
    ///
    /// The date and city names are validated before any provider is
    /// contacted.
    pub async fn aggregate(
        &self,
        from: &str,
        to: &str,
        date: &str,
        mode: Mode,
    ) -> Result<Arc<AggregatedResult>, AggregateError> {
        let date = TravelDate::parse(date)?;
        let route = Route::parse(from, to)?;
        Ok(self.aggregate_route(route, date, mode).await)
    }

    /// Aggregate for an already-validated route and date.
    ///
    /// A live cache entry is returned as is. Otherwise every provider is
    /// called concurrently, each bounded by its own timeout, and the merged
    /// result is cached even when it is empty.
    pub async fn aggregate_route(
        &self,
        route: Route,
        date: TravelDate,
        mode: Mode,
    ) -> Arc<AggregatedResult> {
        let key = CacheKey::new(route, date, mode);

        if let Some(entry) = self.cache.get(&key).await {
            debug!(
                route = %key.route,
                date = %key.date,
                mode = %mode,
                cached_at = %entry.created_at,
                "Cache hit"
            );
            return entry.result;
        }

        let started = Instant::now();
        let route = &key.route;

        let outcomes = join_all(self.providers.iter().map(|provider| async move {
            let outcome = fetch_bounded(provider.as_ref(), route, date).await;
            (provider.name().to_string(), outcome)
        }))
        .await;

        let result = Arc::new(AggregatedResult::combine(mode, outcomes));

        info!(
            route = %key.route,
            date = %key.date,
            mode = %mode,
            providers = self.providers.len(),
            unavailable = result.unavailable().len(),
            empty = result.is_empty(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated"
        );

        self.cache.put(key, result.clone()).await;
        debug!(entries = self.cache.entry_count(), "Cached aggregated result");
        result
    }
}

/// Call one provider under its timeout. Any failure becomes `None`.
async fn fetch_bounded(
    provider: &dyn FareProvider,
    route: &Route,
    date: TravelDate,
) -> Option<ProviderResult> {
    let limit = provider.timeout();
    let outcome = match tokio::time::timeout(limit, provider.fetch(route, date)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderError::Timeout(limit)),
    };

    match outcome {
        Ok(result) => Some(result),
        Err(e) => {
            warn!(
                provider = provider.name(),
                route = %route,
                date = %date,
                error = %e,
                "Provider unavailable"
            );
            None
        }
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("providers", &self.provider_names())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
