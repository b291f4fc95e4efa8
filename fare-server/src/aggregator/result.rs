//! Aggregated result types and the merge policy across providers.

use std::fmt;

use serde::Serialize;

use crate::domain::{Fare, TaggedOffering};
use crate::providers::ProviderResult;

/// What kind of answer to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One cheapest fare per provider, plus the overall cheapest.
    FareComparison,
    /// Every service every provider listed.
    ServiceListing,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::FareComparison => "fares",
            Mode::ServiceListing => "services",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider's contribution to a fare comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFare {
    pub provider: String,
    pub fare: Fare,
}

/// Cheapest fare per provider, in configured provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareComparison {
    /// Providers that quoted a fare. Providers with nothing to quote are
    /// absent rather than listed with a zero.
    pub fares: Vec<ProviderFare>,

    /// Providers that failed for this request.
    pub unavailable: Vec<String>,
}

impl FareComparison {
    /// The lowest fare. Ties go to the provider listed first.
    pub fn cheapest(&self) -> Option<&ProviderFare> {
        let mut best: Option<&ProviderFare> = None;
        for entry in &self.fares {
            if best.is_none_or(|b| entry.fare < b.fare) {
                best = Some(entry);
            }
        }
        best
    }
}

/// Offerings from every provider, tagged with their source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceListing {
    /// Provider order first, then each provider's own order.
    pub offerings: Vec<TaggedOffering>,

    /// Providers that failed for this request.
    pub unavailable: Vec<String>,
}

/// The merged answer for one route, date and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregatedResult {
    Fares(FareComparison),
    Services(ServiceListing),
}

impl AggregatedResult {
    /// Merge per-provider outcomes, given in configured provider order.
    ///
    /// `None` marks a provider that was unavailable.
    pub fn combine(mode: Mode, outcomes: Vec<(String, Option<ProviderResult>)>) -> Self {
        match mode {
            Mode::FareComparison => {
                let mut comparison = FareComparison::default();
                for (provider, outcome) in outcomes {
                    match outcome {
                        Some(result) => {
                            if let Some(fare) = result.cheapest_fare() {
                                comparison.fares.push(ProviderFare { provider, fare });
                            }
                        }
                        None => comparison.unavailable.push(provider),
                    }
                }
                AggregatedResult::Fares(comparison)
            }
            Mode::ServiceListing => {
                let mut listing = ServiceListing::default();
                for (provider, outcome) in outcomes {
                    match outcome {
                        Some(result) => {
                            listing.offerings.extend(result.into_offerings().into_iter().map(
                                |offering| TaggedOffering {
                                    provider: provider.clone(),
                                    offering,
                                },
                            ));
                        }
                        None => listing.unavailable.push(provider),
                    }
                }
                AggregatedResult::Services(listing)
            }
        }
    }

    /// The mode this result was built for.
    pub fn mode(&self) -> Mode {
        match self {
            AggregatedResult::Fares(_) => Mode::FareComparison,
            AggregatedResult::Services(_) => Mode::ServiceListing,
        }
    }

    /// True when no provider contributed anything.
    pub fn is_empty(&self) -> bool {
        match self {
            AggregatedResult::Fares(c) => c.fares.is_empty(),
            AggregatedResult::Services(l) => l.offerings.is_empty(),
        }
    }

    /// Providers that were unavailable.
    pub fn unavailable(&self) -> &[String] {
        match self {
            AggregatedResult::Fares(c) => &c.unavailable,
            AggregatedResult::Services(l) => &l.unavailable,
        }
    }

    pub fn as_fares(&self) -> Option<&FareComparison> {
        match self {
            AggregatedResult::Fares(c) => Some(c),
            AggregatedResult::Services(_) => None,
        }
    }

    pub fn as_services(&self) -> Option<&ServiceListing> {
        match self {
            AggregatedResult::Services(l) => Some(l),
            AggregatedResult::Fares(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceOffering;

    fn fare(rupees: u64) -> Option<ProviderResult> {
        Some(ProviderResult::CheapestFare(Some(Fare::from_rupees(rupees))))
    }

    fn services(operators: &[(&str, Option<u64>)]) -> Option<ProviderResult> {
        Some(ProviderResult::Services(
            operators
                .iter()
                .map(|(op, fare)| ServiceOffering {
                    operator: Some((*op).to_string()),
                    fare: fare.map(Fare::from_rupees),
                    ..Default::default()
                })
                .collect(),
        ))
    }

    #[test]
    fn cheapest_picks_minimum_and_omits_unavailable() {
        let result = AggregatedResult::combine(
            Mode::FareComparison,
            vec![
                ("A".into(), fare(500)),
                ("B".into(), fare(420)),
                ("C".into(), None),
            ],
        );
        let comparison = result.as_fares().unwrap();
        let cheapest = comparison.cheapest().unwrap();
        assert_eq!(cheapest.provider, "B");
        assert_eq!(cheapest.fare, Fare::from_rupees(420));
        assert_eq!(comparison.fares.len(), 2);
        assert_eq!(comparison.unavailable, vec!["C"]);
    }

    #[test]
    fn ties_go_to_first_provider() {
        let result = AggregatedResult::combine(
            Mode::FareComparison,
            vec![
                ("A".into(), fare(600)),
                ("B".into(), fare(450)),
                ("C".into(), fare(450)),
            ],
        );
        assert_eq!(result.as_fares().unwrap().cheapest().unwrap().provider, "B");
    }

    #[test]
    fn services_reduce_to_their_minimum_fare() {
        let result = AggregatedResult::combine(
            Mode::FareComparison,
            vec![
                ("A".into(), services(&[("X", Some(900)), ("Y", None), ("Z", Some(700))])),
                ("B".into(), services(&[("W", None)])),
            ],
        );
        let comparison = result.as_fares().unwrap();
        assert_eq!(
            comparison.fares,
            vec![ProviderFare {
                provider: "A".into(),
                fare: Fare::from_rupees(700)
            }]
        );
        assert!(comparison.unavailable.is_empty());
    }

    #[test]
    fn listing_concatenates_in_provider_order() {
        let result = AggregatedResult::combine(
            Mode::ServiceListing,
            vec![
                ("A".into(), services(&[("A1", Some(800)), ("A2", None)])),
                ("B".into(), fare(300)),
                ("C".into(), services(&[("C1", Some(500))])),
                ("D".into(), None),
            ],
        );
        let listing = result.as_services().unwrap();
        let tags: Vec<_> = listing
            .offerings
            .iter()
            .map(|o| (o.provider.as_str(), o.offering.operator.as_deref().unwrap()))
            .collect();
        assert_eq!(tags, vec![("A", "A1"), ("A", "A2"), ("C", "C1")]);
        assert_eq!(listing.unavailable, vec!["D"]);
    }

    #[test]
    fn all_unavailable_is_empty_not_error() {
        for mode in [Mode::FareComparison, Mode::ServiceListing] {
            let result =
                AggregatedResult::combine(mode, vec![("A".into(), None), ("B".into(), None)]);
            assert!(result.is_empty());
            assert_eq!(result.unavailable(), ["A", "B"]);
            assert_eq!(result.mode(), mode);
        }
    }

    #[test]
    fn empty_comparison_has_no_cheapest() {
        assert_eq!(FareComparison::default().cheapest(), None);
    }
}
