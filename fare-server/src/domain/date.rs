//! Travel date parsing and per-provider rendering.
//!
//! Users type dates as `DD-MM-YYYY`. Each provider wants its own wire format,
//! so a parsed [`TravelDate`] can be rendered with any [`DateFormat`].

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Error returned when parsing an invalid travel date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid travel date {input:?}: {reason}")]
pub struct DateError {
    input: String,
    reason: &'static str,
}

impl DateError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Output pattern a provider expects for dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `14-09-2025`
    DayMonthYear,
    /// `14-Sep-2025`
    DayAbbrevMonthYear,
    /// `2025-09-14`
    IsoDate,
}

impl DateFormat {
    /// The chrono format string for this pattern.
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d-%m-%Y",
            DateFormat::DayAbbrevMonthYear => "%d-%b-%Y",
            DateFormat::IsoDate => "%Y-%m-%d",
        }
    }
}

/// A calendar date to travel on, with no time or timezone.
///
/// # Examples
///
/// ```
/// use fare_server::domain::{DateFormat, TravelDate};
///
/// let date = TravelDate::parse("14-09-2025").unwrap();
/// assert_eq!(date.render(DateFormat::IsoDate), "2025-09-14");
/// assert_eq!(date.render(DateFormat::DayAbbrevMonthYear), "14-Sep-2025");
///
/// // Impossible dates are rejected, not clamped
/// assert!(TravelDate::parse("31-04-2025").is_err());
/// assert!(TravelDate::parse("31-13-2025").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TravelDate(NaiveDate);

impl TravelDate {
    /// Wrap an existing calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a date in `DD-MM-YYYY` form.
    ///
    /// The input must be exactly ten characters with zero-padded day and
    /// month. Surrounding whitespace is tolerated.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let s = input.trim();
        let bytes = s.as_bytes();

        if bytes.len() != 10 {
            return Err(DateError::new(input, "expected DD-MM-YYYY"));
        }

        if bytes[2] != b'-' || bytes[5] != b'-' {
            return Err(DateError::new(input, "expected '-' separators"));
        }

        let day = parse_digits(&bytes[0..2]).ok_or_else(|| DateError::new(input, "invalid day"))?;
        let month =
            parse_digits(&bytes[3..5]).ok_or_else(|| DateError::new(input, "invalid month"))?;
        let year =
            parse_digits(&bytes[6..10]).ok_or_else(|| DateError::new(input, "invalid year"))?;

        if !(1..=12).contains(&month) {
            return Err(DateError::new(input, "month must be 01-12"));
        }

        if year == 0 {
            return Err(DateError::new(input, "year must be 0001 or later"));
        }

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| DateError::new(input, "no such day in that month"))?;

        Ok(Self(date))
    }

    /// Render this date in a provider's wire format.
    pub fn render(&self, format: DateFormat) -> String {
        self.0.format(format.pattern()).to_string()
    }

    /// Returns the underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Parse a run of ASCII digits.
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Some(acc * 10 + u32::from(b - b'0'))
        } else {
            None
        }
    })
}

impl fmt::Debug for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TravelDate({})", self)
    }
}

impl fmt::Display for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}-{:02}-{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output parses back to the same date
        #[test]
        fn display_roundtrip(days in 0i64..20_000) {
            let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let date = TravelDate::new(base + chrono::Duration::days(days));
            prop_assert_eq!(TravelDate::parse(&date.to_string()).unwrap(), date);
        }

        /// Month numbers above 12 are always rejected
        #[test]
        fn bad_month_rejected(day in 1u32..=28, month in 13u32..=99, year in 2000u32..2100) {
            let input = format!("{day:02}-{month:02}-{year:04}");
            prop_assert!(TravelDate::parse(&input).is_err());
        }
    }
}
