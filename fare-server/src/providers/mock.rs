//! Mock provider for testing without network access.
//!
//! Serves a scripted response, optionally after a delay, and counts how many
//! times it was asked. The response can be swapped between calls to simulate
//! an upstream whose data changes.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::cities::CityTable;
use crate::domain::{Fare, Route, ServiceOffering, TravelDate};

use super::{FareProvider, ProviderError, ProviderResult};

/// What a [`MockProvider`] answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A scalar cheapest fare.
    Fare(Option<Fare>),
    /// A service list.
    Services(Vec<ServiceOffering>),
    /// An upstream failure with the given message.
    Fail(String),
    /// Never answer.
    Hang,
}

/// Provider that serves a scripted response.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    response: Mutex<MockResponse>,
    delay: Duration,
    timeout: Duration,
    cities: Option<CityTable<()>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock that answers immediately.
    pub fn new(name: impl Into<String>, response: MockResponse) -> Self {
        Self {
            name: name.into(),
            response: Mutex::new(response),
            delay: Duration::ZERO,
            timeout: Duration::from_secs(5),
            cities: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a mock quoting a whole-rupee fare.
    pub fn fare(name: impl Into<String>, rupees: u64) -> Self {
        Self::new(name, MockResponse::Fare(Some(Fare::from_rupees(rupees))))
    }

    /// Shorthand for a mock that always fails.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, MockResponse::Fail("upstream unavailable".to_string()))
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Report this as the provider's timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Only serve routes between these cities.
    pub fn with_cities(mut self, cities: &[&str]) -> Self {
        self.cities = Some(CityTable::from_entries(cities.iter().map(|c| (*c, ()))));
        self
    }

    /// Replace the scripted response.
    pub fn set_response(&self, response: MockResponse) {
        if let Ok(mut guard) = self.response.lock() {
            *guard = response;
        }
    }

    /// Number of fetches so far, including ones rejected for unknown cities.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond(&self, route: &Route) -> Result<ProviderResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(cities) = &self.cities {
            cities.resolve_route(route)?;
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self
            .response
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| ProviderError::NotConfigured("mock response poisoned".to_string()))?;

        match response {
            MockResponse::Fare(fare) => Ok(ProviderResult::CheapestFare(fare)),
            MockResponse::Services(services) => Ok(ProviderResult::Services(services)),
            MockResponse::Fail(message) => Err(ProviderError::Api {
                status: 503,
                message,
            }),
            MockResponse::Hang => std::future::pending().await,
        }
    }
}

impl FareProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(
        &'a self,
        route: &'a Route,
        _date: TravelDate,
    ) -> BoxFuture<'a, Result<ProviderResult, ProviderError>> {
        self.respond(route).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(from: &str, to: &str) -> Route {
        Route::parse(from, to).unwrap()
    }

    fn date() -> TravelDate {
        TravelDate::parse("14-09-2025").unwrap()
    }

    #[tokio::test]
    async fn serves_scripted_fare() {
        let mock = MockProvider::fare("A", 500);
        let result = mock.fetch(&route("Chennai", "Erode"), date()).await.unwrap();
        assert_eq!(
            result,
            ProviderResult::CheapestFare(Some(Fare::from_rupees(500)))
        );
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        let mock = MockProvider::failing("A");
        let result = mock.fetch(&route("Chennai", "Erode"), date()).await;
        assert!(matches!(result, Err(ProviderError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn response_can_change() {
        let mock = MockProvider::fare("A", 500);
        mock.set_response(MockResponse::Fare(None));
        let result = mock.fetch(&route("Chennai", "Erode"), date()).await.unwrap();
        assert_eq!(result, ProviderResult::CheapestFare(None));
    }

    #[tokio::test]
    async fn city_restriction() {
        let mock = MockProvider::fare("A", 500).with_cities(&["Chennai", "Erode"]);
        assert!(mock.fetch(&route("chennai", "erode"), date()).await.is_ok());
        assert!(matches!(
            mock.fetch(&route("Chennai", "Salem"), date()).await,
            Err(ProviderError::UnknownCity(_))
        ));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn hanging_mock_never_answers() {
        let mock = MockProvider::new("A", MockResponse::Hang);
        let route = route("Chennai", "Erode");
        let result =
            tokio::time::timeout(Duration::from_millis(50), mock.fetch(&route, date())).await;
        assert!(result.is_err());
    }
}
