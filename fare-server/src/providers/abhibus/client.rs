//! AbhiBus mobile API client.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use crate::cities::{CityTable, abhibus_ids};
use crate::domain::{DateFormat, Route, ServiceOffering, TravelDate};
use crate::providers::http::{HttpTransport, ProviderConfig};
use crate::providers::{FareProvider, ProviderError, ProviderResult};

use super::convert::convert_bus_list;
use super::types::{BusListRequest, BusListResponse};

/// Production base URL.
const DEFAULT_BASE_URL: &str = "https://www.abhibus.com";

/// Bus list endpoint path.
const BUS_LIST_PATH: &str = "/wap/GetBusList";

/// Client for the AbhiBus `GetBusList` JSON API.
///
/// Returns full service listings, so it serves both fare comparison (via the
/// cheapest listed fare) and service listing.
#[derive(Debug, Clone)]
pub struct AbhiBusClient {
    transport: HttpTransport,
    cities: CityTable<u32>,
}

impl AbhiBusClient {
    /// Create a client with the built-in city table.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            transport: HttpTransport::new(config, DEFAULT_BASE_URL)?,
            cities: abhibus_ids(),
        })
    }

    /// Replace the city table.
    pub fn with_cities(mut self, cities: CityTable<u32>) -> Self {
        self.cities = cities;
        self
    }

    /// Fetch the services running on a route and date.
    ///
    /// Fails with `UnknownCity` before any request is made if either city has
    /// no AbhiBus id.
    pub async fn get_bus_list(
        &self,
        route: &Route,
        date: TravelDate,
    ) -> Result<Vec<ServiceOffering>, ProviderError> {
        let (source_id, destination_id) = self.cities.resolve_route(route)?;

        let request = BusListRequest {
            source: route.origin.as_str(),
            sourceid: source_id,
            destination: route.destination.as_str(),
            destinationid: destination_id,
            jdate: date.render(DateFormat::IsoDate),
            prd: "mobile",
            filters: 1,
            is_return_journey: "0",
        };

        let body = self
            .transport
            .post_json(&self.transport.url(BUS_LIST_PATH), &request)
            .await?;

        let response: BusListResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::json(&e, &body))?;

        let offerings = convert_bus_list(response)?;

        debug!(
            route = %route,
            date = %date,
            services = offerings.len(),
            "AbhiBus bus list fetched"
        );

        Ok(offerings)
    }
}

impl FareProvider for AbhiBusClient {
    fn name(&self) -> &str {
        "AbhiBus"
    }

    fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    fn fetch<'a>(
        &'a self,
        route: &'a Route,
        date: TravelDate,
    ) -> BoxFuture<'a, Result<ProviderResult, ProviderError>> {
        async move {
            self.get_bus_list(route, date)
                .await
                .map(ProviderResult::Services)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fare;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn route(from: &str, to: &str) -> Route {
        Route::parse(from, to).unwrap()
    }

    fn date() -> TravelDate {
        TravelDate::parse("14-09-2025").unwrap()
    }

    async fn client_for(server: &MockServer) -> AbhiBusClient {
        let config = ProviderConfig::default().with_base_url(server.uri());
        AbhiBusClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn posts_expected_body_and_parses_services() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wap/GetBusList"))
            .and(body_json(json!({
                "source": "Chennai",
                "sourceid": 6,
                "destination": "Erode",
                "destinationid": 867,
                "jdate": "2025-09-14",
                "prd": "mobile",
                "filters": 1,
                "isReturnJourney": "0"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Success",
                "serviceDetailsList": [
                    {"travelerAgentName": "SRS", "fare": 900},
                    {"travelerAgentName": "KPN", "fare": "750"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.fetch(&route(" chennai", "ERODE"), date()).await.unwrap();

        assert_eq!(result.cheapest_fare(), Some(Fare::from_rupees(750)));
        let offerings = result.into_offerings();
        assert_eq!(offerings.len(), 2);
        assert_eq!(offerings[0].operator.as_deref(), Some("SRS"));
    }

    #[tokio::test]
    async fn unknown_city_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.get_bus_list(&route("Chennai", "Ooty"), date()).await;
        assert!(matches!(result, Err(ProviderError::UnknownCity(_))));
    }

    #[tokio::test]
    async fn failure_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "Failure", "message": "No services"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.get_bus_list(&route("Chennai", "Erode"), date()).await;
        assert!(matches!(result, Err(ProviderError::Rejected { .. })));
    }

    #[tokio::test]
    async fn html_error_page_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.get_bus_list(&route("Chennai", "Erode"), date()).await;
        match result {
            Err(ProviderError::Json { body, .. }) => {
                assert_eq!(body.as_deref(), Some("<html>maintenance</html>"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_city_table() {
        let server = MockServer::start().await;
        let config = ProviderConfig::default().with_base_url(server.uri());
        let client = AbhiBusClient::new(&config)
            .unwrap()
            .with_cities(CityTable::from_entries([("Ooty", 1)]));

        let result = client.get_bus_list(&route("Chennai", "Ooty"), date()).await;
        assert!(matches!(result, Err(ProviderError::UnknownCity(_))));
    }
}
