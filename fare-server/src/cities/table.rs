//! Per-provider city lookup.

use std::collections::HashMap;

use crate::domain::{CityName, Route};

/// Error returned when a provider has no id for a city.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("city not served: {0}")]
pub struct CityNotFound(pub CityName);

/// Mapping from canonical city name to a provider's own city identifier.
///
/// Each provider keeps its own table; they are not expected to overlap.
/// Keys are canonicalized on insert, so lookups are insensitive to the case
/// and spacing the user typed.
#[derive(Debug, Clone)]
pub struct CityTable<Id> {
    ids: HashMap<CityName, Id>,
}

impl<Id> Default for CityTable<Id> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }
}

impl<Id: Clone> CityTable<Id> {
    /// Build a table from `(name, id)` pairs.
    ///
    /// Names that don't canonicalize (blank strings) are skipped. Several
    /// names may share an id, which is how aliases are expressed.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Id)>) -> Self {
        let ids = entries
            .into_iter()
            .filter_map(|(name, id)| CityName::parse(name).ok().map(|city| (city, id)))
            .collect();
        Self { ids }
    }

    /// Look up a city's id.
    pub fn resolve(&self, city: &CityName) -> Option<&Id> {
        self.ids.get(city)
    }

    /// Look up both ends of a route.
    ///
    /// Fails on the first end the provider doesn't know.
    pub fn resolve_route(&self, route: &Route) -> Result<(Id, Id), CityNotFound> {
        let from = self
            .resolve(&route.origin)
            .ok_or_else(|| CityNotFound(route.origin.clone()))?;
        let to = self
            .resolve(&route.destination)
            .ok_or_else(|| CityNotFound(route.destination.clone()))?;
        Ok((from.clone(), to.clone()))
    }

    /// Get the number of known city names (aliases count separately).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
