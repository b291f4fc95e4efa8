//! AbhiBus `GetBusList` request and response DTOs.
//!
//! The response types use `Option` everywhere: the mobile API drops fields
//! freely, and numeric fields arrive as either numbers or strings. Per-service
//! fields are read leniently so one odd row can't fail the whole list.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /wap/GetBusList` request.
#[derive(Debug, Clone, Serialize)]
pub struct BusListRequest<'a> {
    /// Origin city name.
    pub source: &'a str,

    /// Origin city id.
    pub sourceid: u32,

    /// Destination city name.
    pub destination: &'a str,

    /// Destination city id.
    pub destinationid: u32,

    /// Journey date, `YYYY-MM-DD`.
    pub jdate: String,

    /// Client product; always "mobile".
    pub prd: &'static str,

    /// Always 1.
    pub filters: u8,

    /// "0" for a one-way search.
    #[serde(rename = "isReturnJourney")]
    pub is_return_journey: &'static str,
}

/// Response from `GetBusList`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusListResponse {
    /// "Success" when the search ran.
    pub status: Option<String>,

    /// Human-readable reason when `status` isn't "Success".
    pub message: Option<String>,

    /// Matching services.
    pub service_details_list: Option<Vec<ServiceDetail>>,
}

/// One bus service in a `GetBusList` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    /// Operator name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub traveler_agent_name: Option<String>,

    /// Coach type.
    #[serde(default, deserialize_with = "lenient_text")]
    pub bus_type_name: Option<String>,

    /// Departure time.
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_time: Option<String>,

    /// Arrival time.
    #[serde(default, deserialize_with = "lenient_text")]
    pub arrive_time: Option<String>,

    /// Seats left; number or numeric string.
    pub available_seats: Option<Value>,

    /// Fare; number or numeric string.
    pub fare: Option<Value>,

    /// Boarding points.
    #[serde(default, deserialize_with = "lenient")]
    pub boarding_info_list: Option<Vec<PlaceInfo>>,

    /// Dropping points.
    #[serde(default, deserialize_with = "lenient")]
    pub dropping_info_list: Option<Vec<PlaceInfo>>,
}

/// A boarding or dropping point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceInfo {
    #[serde(default, deserialize_with = "lenient_text")]
    pub place_name: Option<String>,
}

/// Read a text field, accepting numbers and booleans in their printed form.
/// Anything else (objects, arrays, null) reads as absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Read a field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}
