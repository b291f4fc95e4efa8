//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::aggregator::{FareComparison, ProviderFare, ServiceListing};
use crate::domain::TaggedOffering;

/// Request to list bus services on a route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Origin city as typed
    pub from_city: Option<String>,

    /// Destination city as typed
    pub to_city: Option<String>,

    /// Date in DD-MM-YYYY format
    pub travel_date: Option<String>,

    /// "fare" (default) or "time"
    pub sort_order: Option<String>,
}

/// Services found for a route.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Offerings, sorted and truncated
    pub result: Vec<TaggedOffering>,

    /// Providers that couldn't be reached
    pub unavailable: Vec<String>,
}

impl SearchResponse {
    /// Build from a listing; `offerings` are already sorted and truncated.
    pub fn new(offerings: Vec<TaggedOffering>, listing: &ServiceListing) -> Self {
        Self {
            result: offerings,
            unavailable: listing.unavailable.clone(),
        }
    }
}

/// Request to compare fares on a route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub travel_date: Option<String>,
}

/// Cheapest fare per provider and overall.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    /// One entry per provider that quoted a fare, in provider order
    pub fares: Vec<ProviderFare>,

    /// Lowest of `fares`, absent when nobody quoted
    pub cheapest: Option<ProviderFare>,

    /// Providers that couldn't be reached
    pub unavailable: Vec<String>,
}

impl From<&FareComparison> for CompareResponse {
    fn from(comparison: &FareComparison) -> Self {
        Self {
            fares: comparison.fares.clone(),
            cheapest: comparison.cheapest().cloned(),
            unavailable: comparison.unavailable.clone(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Pull a required, non-blank field out of a request.
pub(crate) fn required<'a>(field: &'a Option<String>) -> Option<&'a str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
