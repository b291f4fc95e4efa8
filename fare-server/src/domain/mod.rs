//! Domain types for the fare aggregator.
//!
//! Everything here is validated at construction time: a [`CityName`] is
//! always canonical, a [`TravelDate`] is always a real calendar date, and a
//! [`Fare`] is never negative.

mod city;
mod date;
mod fare;
mod offering;

pub use city::{CityName, InvalidCity, Route};
pub use date::{DateError, DateFormat, TravelDate};
pub use fare::{Fare, InvalidFare};
pub use offering::{
    ServiceOffering, SortOrder, TaggedOffering, parse_clock_minutes, sort_offerings,
};
