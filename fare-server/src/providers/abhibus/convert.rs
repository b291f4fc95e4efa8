//! Conversion from AbhiBus DTOs to [`ServiceOffering`]s.

use serde_json::Value;
use tracing::trace;

use crate::domain::{Fare, ServiceOffering};
use crate::providers::ProviderError;

use super::types::{BusListResponse, PlaceInfo, ServiceDetail};

/// The only `status` value that means the search succeeded.
const SUCCESS_STATUS: &str = "Success";

/// Convert a bus list response into offerings.
///
/// A response whose `status` isn't "Success" is a rejection. A successful
/// response with no list means there are no buses. Services that carry no
/// usable fields are dropped.
pub fn convert_bus_list(response: BusListResponse) -> Result<Vec<ServiceOffering>, ProviderError> {
    if response.status.as_deref() != Some(SUCCESS_STATUS) {
        return Err(ProviderError::Rejected {
            message: response
                .message
                .or(response.status)
                .unwrap_or_else(|| "missing status".to_string()),
        });
    }

    let services = response.service_details_list.unwrap_or_default();
    let total = services.len();

    let offerings: Vec<ServiceOffering> = services
        .into_iter()
        .map(convert_service)
        .filter(|o| !o.is_blank())
        .collect();

    if offerings.len() < total {
        trace!(
            dropped = total - offerings.len(),
            "Skipped blank AbhiBus services"
        );
    }

    Ok(offerings)
}

/// Convert a single service.
pub fn convert_service(detail: ServiceDetail) -> ServiceOffering {
    ServiceOffering {
        operator: non_empty(detail.traveler_agent_name),
        bus_type: non_empty(detail.bus_type_name),
        departure_time: non_empty(detail.start_time),
        arrival_time: non_empty(detail.arrive_time),
        seats_available: detail.available_seats.as_ref().and_then(value_to_u32),
        fare: detail.fare.as_ref().and_then(value_to_fare),
        boarding_points: place_names(detail.boarding_info_list),
        dropping_points: place_names(detail.dropping_info_list),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn place_names(places: Option<Vec<PlaceInfo>>) -> Vec<String> {
    places
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| non_empty(p.place_name))
        .collect()
}

/// Read a count from a JSON number or numeric string.
fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a fare from a JSON number or a price string.
fn value_to_fare(value: &Value) -> Option<Fare> {
    match value {
        Value::Number(n) => n.as_f64().and_then(Fare::from_f64),
        Value::String(s) => Fare::parse(s).ok(),
        _ => None,
    }
}
