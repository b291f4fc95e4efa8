//! Bus booking site clients.
//!
//! Each upstream site sits behind the [`FareProvider`] trait. A provider:
//! - resolves the route's cities in its own id space before any network I/O,
//! - makes one outbound request bounded by its own timeout,
//! - maps the site's response into a [`ProviderResult`].
//!
//! Any failure comes back as a [`ProviderError`], which the aggregator treats
//! as "unavailable for this request" and never passes on to the caller.

mod abhibus;
mod error;
mod html;
mod http;
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::domain::{Fare, Route, ServiceOffering, TravelDate};

pub use abhibus::AbhiBusClient;
pub use error::ProviderError;
pub use html::{HtmlFareProvider, HtmlSite, extract_fares};
pub use http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpTransport, ProviderConfig};

/// What a provider found for a route and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    /// The lowest fare the site quoted; `None` when it listed nothing.
    CheapestFare(Option<Fare>),

    /// Individual bus services, in the site's order.
    Services(Vec<ServiceOffering>),
}

impl ProviderResult {
    /// The single fare this result contributes to a fare comparison.
    ///
    /// For a service list this is the minimum over offerings that carry a
    /// fare; offerings without one are ignored rather than read as zero.
    pub fn cheapest_fare(&self) -> Option<Fare> {
        match self {
            ProviderResult::CheapestFare(fare) => *fare,
            ProviderResult::Services(services) => services.iter().filter_map(|s| s.fare).min(),
        }
    }

    /// The offerings this result contributes to a service listing.
    pub fn into_offerings(self) -> Vec<ServiceOffering> {
        match self {
            ProviderResult::CheapestFare(_) => Vec::new(),
            ProviderResult::Services(services) => services,
        }
    }
}

/// A single upstream fare source.
pub trait FareProvider: Send + Sync {
    /// Display name, also used to tag results.
    fn name(&self) -> &str;

    /// Upper bound on how long one fetch may take.
    fn timeout(&self) -> Duration;

    /// Query the provider for a route on a date.
    fn fetch<'a>(
        &'a self,
        route: &'a Route,
        date: TravelDate,
    ) -> BoxFuture<'a, Result<ProviderResult, ProviderError>>;
}

/// The bundled providers in their configured order: RedBus, AbhiBus,
/// MakeMyTrip.
pub fn default_providers(
    config: &ProviderConfig,
) -> Result<Vec<Arc<dyn FareProvider>>, ProviderError> {
    Ok(vec![
        Arc::new(HtmlFareProvider::new(HtmlSite::redbus(), config)?),
        Arc::new(AbhiBusClient::new(config)?),
        Arc::new(HtmlFareProvider::new(HtmlSite::makemytrip(), config)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(fare: Option<u64>) -> ServiceOffering {
        ServiceOffering {
            operator: Some("KPN Travels".to_string()),
            fare: fare.map(Fare::from_rupees),
            ..Default::default()
        }
    }

    #[test]
    fn cheapest_fare_of_services_skips_missing() {
        let result = ProviderResult::Services(vec![
            offering(Some(800)),
            offering(None),
            offering(Some(650)),
        ]);
        assert_eq!(result.cheapest_fare(), Some(Fare::from_rupees(650)));
    }

    #[test]
    fn services_without_any_fare_have_no_cheapest() {
        let result = ProviderResult::Services(vec![offering(None)]);
        assert_eq!(result.cheapest_fare(), None);
        assert_eq!(result.into_offerings().len(), 1);
    }

    #[test]
    fn scalar_fare_has_no_offerings() {
        let result = ProviderResult::CheapestFare(Some(Fare::from_rupees(420)));
        assert_eq!(result.cheapest_fare(), Some(Fare::from_rupees(420)));
        assert!(result.into_offerings().is_empty());
    }

    #[test]
    fn default_provider_order() {
        let providers = default_providers(&ProviderConfig::default()).unwrap();
        let names: Vec<_> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["RedBus", "AbhiBus", "MakeMyTrip"]);
        assert!(
            providers
                .iter()
                .all(|p| p.timeout() == Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );
    }
}
