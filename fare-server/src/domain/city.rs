//! City name and route types.

use std::fmt;

use serde::Serialize;

/// Error returned when a city name has no usable content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid city name: {reason}")]
pub struct InvalidCity {
    reason: &'static str,
}

/// A canonical city name.
///
/// User input is trimmed, runs of whitespace are collapsed to a single space
/// and every word is title-cased. Two inputs that differ only in case or
/// spacing therefore produce equal `CityName`s.
///
/// # Examples
///
/// ```
/// use fare_server::domain::CityName;
///
/// let a = CityName::parse("Chennai").unwrap();
/// let b = CityName::parse("  chennai ").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b.as_str(), "Chennai");
///
/// let c = CityName::parse("new   DELHI").unwrap();
/// assert_eq!(c.as_str(), "New Delhi");
///
/// assert!(CityName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CityName(String);

impl CityName {
    /// Parse and canonicalize a city name.
    pub fn parse(s: &str) -> Result<Self, InvalidCity> {
        let mut out = String::with_capacity(s.len());

        for word in s.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                for c in chars {
                    out.extend(c.to_lowercase());
                }
            }
        }

        if out.is_empty() {
            return Err(InvalidCity {
                reason: "must contain at least one non-space character",
            });
        }

        if out.chars().any(char::is_control) {
            return Err(InvalidCity {
                reason: "must not contain control characters",
            });
        }

        Ok(Self(out))
    }

    /// Returns the canonical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CityName({})", self.0)
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An origin/destination pair of canonical city names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub origin: CityName,
    pub destination: CityName,
}

impl Route {
    /// Create a route from two already-canonical names.
    pub fn new(origin: CityName, destination: CityName) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Canonicalize both ends of a route from raw user input.
    pub fn parse(origin: &str, destination: &str) -> Result<Self, InvalidCity> {
        Ok(Self::new(CityName::parse(origin)?, CityName::parse(destination)?))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Canonicalizing twice changes nothing
        #[test]
        fn idempotent(s in "[ a-zA-Z]{1,20}") {
            if let Ok(once) = CityName::parse(&s) {
                let twice = CityName::parse(once.as_str()).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        /// Case and surrounding whitespace never affect the result
        #[test]
        fn case_and_padding_insensitive(s in "[a-z]{1,12}", pad in " {0,3}") {
            let lower = CityName::parse(&s).unwrap();
            let upper = CityName::parse(&format!("{pad}{}{pad}", s.to_uppercase())).unwrap();
            prop_assert_eq!(lower, upper);
        }
    }
}
