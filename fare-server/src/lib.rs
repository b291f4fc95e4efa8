//! Bus fare aggregation server.
//!
//! A web application that answers: "what buses run from this city to that
//! one on this date, and which booking site has the cheapest seat?"

pub mod aggregator;
pub mod cache;
pub mod cities;
pub mod config;
pub mod domain;
pub mod providers;
pub mod web;
