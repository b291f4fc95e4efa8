//! Normalized bus service offerings.
//!
//! Every booking site describes a bus trip with its own field names. Providers
//! map those into [`ServiceOffering`], leaving anything the site didn't send
//! as `None` rather than inventing a value.

use std::cmp::Ordering;

use serde::Serialize;

use super::Fare;

/// One bus trip as reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    /// Bus operator (travels company) name.
    pub operator: Option<String>,

    /// Coach description, e.g. "A/C Sleeper (2+1)".
    pub bus_type: Option<String>,

    /// Departure time exactly as the provider printed it.
    pub departure_time: Option<String>,

    /// Arrival time exactly as the provider printed it.
    pub arrival_time: Option<String>,

    /// Seats still available.
    pub seats_available: Option<u32>,

    /// Ticket price.
    pub fare: Option<Fare>,

    /// Boarding point names, in provider order.
    pub boarding_points: Vec<String>,

    /// Dropping point names, in provider order.
    pub dropping_points: Vec<String>,
}

impl ServiceOffering {
    /// True when the provider told us nothing at all about this trip.
    pub fn is_blank(&self) -> bool {
        self.operator.is_none()
            && self.bus_type.is_none()
            && self.departure_time.is_none()
            && self.arrival_time.is_none()
            && self.seats_available.is_none()
            && self.fare.is_none()
            && self.boarding_points.is_empty()
            && self.dropping_points.is_empty()
    }

    /// Departure time as minutes after midnight, if it can be read.
    pub fn departure_minutes(&self) -> Option<u16> {
        self.departure_time.as_deref().and_then(parse_clock_minutes)
    }
}

/// An offering tagged with the provider it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedOffering {
    pub provider: String,

    #[serde(flatten)]
    pub offering: ServiceOffering,
}

/// How to order a service listing for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first.
    #[default]
    Fare,
    /// Earliest departure first.
    Time,
}

impl SortOrder {
    /// Parse a sort order name as sent by clients.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fare" | "price" => Some(SortOrder::Fare),
            "time" | "departure" => Some(SortOrder::Time),
            _ => None,
        }
    }
}

/// Sort offerings in place.
///
/// The sort is stable, so offerings with equal keys keep provider order.
/// Offerings missing the sort key go last.
pub fn sort_offerings(offerings: &mut [TaggedOffering], order: SortOrder) {
    match order {
        SortOrder::Fare => {
            offerings.sort_by(|a, b| none_last(a.offering.fare, b.offering.fare));
        }
        SortOrder::Time => {
            offerings.sort_by(|a, b| {
                none_last(a.offering.departure_minutes(), b.offering.departure_minutes())
            });
        }
    }
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse a clock time as minutes after midnight.
///
/// Accepts 24-hour `HH:MM` and 12-hour `hh:mm AM`/`hh:mm PM`. Providers
/// sometimes append seconds (`21:30:00`); those are ignored.
///
/// # Examples
///
/// ```
/// use fare_server::domain::parse_clock_minutes;
///
/// assert_eq!(parse_clock_minutes("21:30"), Some(21 * 60 + 30));
/// assert_eq!(parse_clock_minutes("09:15 PM"), Some(21 * 60 + 15));
/// assert_eq!(parse_clock_minutes("12:05 AM"), Some(5));
/// assert_eq!(parse_clock_minutes("late"), None);
/// ```
pub fn parse_clock_minutes(s: &str) -> Option<u16> {
    let s = s.trim();
    let (clock, meridiem) = match s.split_once(char::is_whitespace) {
        Some((clock, rest)) => (clock, Some(rest.trim().to_ascii_uppercase())),
        None => (s, None),
    };

    let mut parts = clock.split(':');
    let hours: u16 = parts.next()?.parse().ok()?;
    let minutes: u16 = parts.next()?.parse().ok()?;
    if minutes > 59 {
        return None;
    }

    let hours = match meridiem.as_deref() {
        None => {
            if hours > 23 {
                return None;
            }
            hours
        }
        Some(m) => {
            if !(1..=12).contains(&hours) {
                return None;
            }
            match m {
                "AM" => hours % 12,
                "PM" => hours % 12 + 12,
                _ => return None,
            }
        }
    };

    Some(hours * 60 + minutes)
}
