//! Built-in city tables for the bundled providers.

use super::table::CityTable;

/// AbhiBus numeric city ids.
const ABHIBUS_IDS: &[(&str, u32)] = &[
    ("Chennai", 6),
    ("Coimbatore", 794),
    ("Bangalore", 7),
    ("Ramnad", 1970),
    ("Salem", 868),
    ("Erode", 867),
    ("Namakkal", 1859),
    ("Tirupathi", 12),
    ("Tiruvannamalai", 3197),
    ("Tirupattur", 2127),
    ("Madurai", 1016),
    ("Polur", 8187),
    ("Thirunalveli", 2123),
    ("Thiruchendur", 3179),
    ("Trichy", 795),
    ("Tiruchirappalli", 795),
];

/// Cities the HTML-scraped sites are known to list under their plain name.
const SCRAPED_CITIES: &[&str] = &[
    "Chennai",
    "Coimbatore",
    "Bangalore",
    "Salem",
    "Erode",
    "Namakkal",
    "Tirupathi",
    "Tiruvannamalai",
    "Madurai",
    "Trichy",
];

/// City ids for the AbhiBus JSON API.
pub fn abhibus_ids() -> CityTable<u32> {
    CityTable::from_entries(ABHIBUS_IDS.iter().copied())
}

/// URL slugs for RedBus search pages (lowercase names).
pub fn redbus_slugs() -> CityTable<String> {
    CityTable::from_entries(SCRAPED_CITIES.iter().map(|c| (*c, c.to_lowercase())))
}

/// URL slugs for MakeMyTrip search pages (names as written).
pub fn makemytrip_slugs() -> CityTable<String> {
    CityTable::from_entries(SCRAPED_CITIES.iter().map(|c| (*c, (*c).to_string())))
}
