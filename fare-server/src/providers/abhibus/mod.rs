//! AbhiBus JSON API provider.
//!
//! The mobile site's `GetBusList` endpoint takes numeric city ids and an
//! ISO date, and returns a full service list with a `status` field that must
//! read "Success".

mod client;
mod convert;
mod types;

pub use client::AbhiBusClient;
