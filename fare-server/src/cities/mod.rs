//! City resolution.
//!
//! Maps canonical city names onto each provider's own identifiers. A provider
//! that doesn't know a city is simply skipped for that request.

mod known;
mod table;

pub use known::{abhibus_ids, makemytrip_slugs, redbus_slugs};
pub use table::{CityNotFound, CityTable};
