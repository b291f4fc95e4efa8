//! Fare amounts.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when a fare string can't be read as an amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fare: {0:?}")]
pub struct InvalidFare(String);

/// A ticket price in Indian rupees, held as whole paise.
///
/// Fares are totally ordered so the cheapest can be picked without any
/// floating-point comparison.
///
/// # Examples
///
/// ```
/// use fare_server::domain::Fare;
///
/// let fare = Fare::parse("₹1,250").unwrap();
/// assert_eq!(fare, Fare::from_rupees(1250));
/// assert_eq!(fare.to_string(), "₹1250");
///
/// assert_eq!(Fare::parse("499.5").unwrap().to_string(), "₹499.50");
/// assert!(Fare::parse("call for price").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fare {
    paise: u64,
}

impl Fare {
    /// A fare of a whole number of rupees.
    pub const fn from_rupees(rupees: u64) -> Self {
        Self {
            paise: rupees * 100,
        }
    }

    /// A fare given in paise.
    pub const fn from_paise(paise: u64) -> Self {
        Self { paise }
    }

    /// Parse a fare as printed by a booking site.
    ///
    /// The rupee sign, thousands separators and surrounding whitespace are
    /// ignored. What remains must be digits with an optional decimal part of
    /// at most two digits.
    pub fn parse(s: &str) -> Result<Self, InvalidFare> {
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, '₹' | ',') && !c.is_whitespace())
            .collect();
        let cleaned = cleaned.strip_prefix("Rs.").unwrap_or(&cleaned);

        let invalid = || InvalidFare(s.to_string());

        let (whole, frac) = match cleaned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (cleaned, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let rupees: u64 = whole.parse().map_err(|_| invalid())?;
        let paise = match frac.len() {
            0 => 0,
            1 => u64::from(frac.as_bytes()[0] - b'0') * 10,
            _ => frac.parse::<u64>().map_err(|_| invalid())?,
        };

        rupees
            .checked_mul(100)
            .and_then(|p| p.checked_add(paise))
            .map(Self::from_paise)
            .ok_or_else(invalid)
    }

    /// Read a fare from a JSON number, rejecting negatives and NaN.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let paise = (value * 100.0).round();
        if paise > u64::MAX as f64 {
            return None;
        }
        Some(Self::from_paise(paise as u64))
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = self.paise / 100;
        let paise = self.paise % 100;
        if paise == 0 {
            write!(f, "₹{rupees}")
        } else {
            write!(f, "₹{rupees}.{paise:02}")
        }
    }
}

impl Serialize for Fare {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole rupees serialize as integers, matching what the sites send
        if self.paise % 100 == 0 {
            serializer.serialize_u64(self.paise / 100)
        } else {
            serializer.serialize_f64(self.paise as f64 / 100.0)
        }
    }
}
