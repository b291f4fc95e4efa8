//! Fare aggregation across booking sites.
//!
//! Answers "what does a bus from A to B on this date cost?" by asking every
//! configured provider at once, tolerating any subset of them failing, and
//! merging the rest into either a fare comparison or a service listing.
//! Merged answers are cached per route, date and mode.

mod engine;
mod result;

pub use engine::{AggregateError, Aggregator};
pub use result::{AggregatedResult, FareComparison, Mode, ProviderFare, ServiceListing};
