//! # Derivation Resolver
//!
//! Runs the full pipeline for one entity kind:
//!
//! 1. **Group** candidates by natural key (invalid keys are rejected).
//! 2. **Order** every group most specific first.
//! 3. **Filter** groups on the requested override type.
//! 4. **Fold** every surviving group with the kind's [`EntityProfile`].
//!
//! With [`FilterAnchor::SuppliedFirst`] steps 2 and 3 swap, and the filter
//! inspects each group's first candidate exactly as supplied.
//!
//! The resolver is a deterministic function of its input. It performs no
//! I/O, keeps no state between calls, and never retries.

use serde::Serialize;

use payroll_core::{EntityKind, OverrideType, PayrollError, PayrollResult};

use crate::candidate::{derivation_order, is_derivation_ordered, Candidate};
use crate::config::{FilterAnchor, ResolverConfig};
use crate::filter::OverrideFilter;
use crate::group::{group_candidates, Groups};
use crate::merge::derive_group;
use crate::profile::Derivable;
use crate::query::DerivationQuery;
use crate::supplier::CandidateSupplier;

/// Counters describing one resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Candidates received.
    pub candidates: usize,
    /// Groups formed before filtering.
    pub groups: usize,
    /// Groups removed by the override filter.
    pub filtered_groups: usize,
    /// Candidates removed with those groups.
    pub filtered_candidates: usize,
}

/// One named object after derivation.
///
/// `effective` is the fully folded, most specific candidate. `base_layers`
/// holds the remaining candidates in derivation order, each folded over its
/// own layer and the layers below it, for layer-by-layer inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedGroup<T: Derivable> {
    pub key: T::Key,
    pub effective: Candidate<T>,
    pub base_layers: Vec<Candidate<T>>,
}

impl<T: Derivable> DerivedGroup<T> {
    fn from_folded(key: T::Key, folded: Vec<Candidate<T>>) -> Option<Self> {
        let mut layers = folded.into_iter();
        let effective = layers.next()?;
        Some(Self {
            key,
            effective,
            base_layers: layers.collect(),
        })
    }

    /// All layers in derivation order, effective first.
    pub fn layers(&self) -> impl Iterator<Item = &Candidate<T>> {
        std::iter::once(&self.effective).chain(self.base_layers.iter())
    }

    /// Number of layers defining this object.
    pub fn depth(&self) -> usize {
        1 + self.base_layers.len()
    }
}

/// The derived objects of one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution<T: Derivable> {
    pub kind: EntityKind,
    /// Groups ordered by key.
    pub groups: Vec<DerivedGroup<T>>,
    pub stats: ResolutionStats,
}

impl<T: Derivable> Resolution<T> {
    /// The effective candidate of every group.
    pub fn effective(&self) -> Vec<&Candidate<T>> {
        self.groups.iter().map(|g| &g.effective).collect()
    }

    /// The effective object of every group.
    pub fn effective_objects(&self) -> Vec<&T> {
        self.groups.iter().map(|g| &g.effective.object).collect()
    }

    /// Look up a group by key.
    pub fn get(&self, key: &T::Key) -> Option<&DerivedGroup<T>> {
        self.groups
            .binary_search_by(|group| group.key.cmp(key))
            .ok()
            .map(|index| &self.groups[index])
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group survived.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flatten into every folded candidate, group by group in derivation
    /// order.
    pub fn into_candidates(self) -> Vec<Candidate<T>> {
        self.groups
            .into_iter()
            .flat_map(|group| std::iter::once(group.effective).chain(group.base_layers))
            .collect()
    }
}

/// The derivation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationResolver {
    config: ResolverConfig,
}

impl DerivationResolver {
    /// Create a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a flat candidate list.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidArgument`] if a candidate has an
    /// invalid key.
    pub fn resolve<T: Derivable>(
        &self,
        candidates: Vec<Candidate<T>>,
        wanted: Option<OverrideType>,
    ) -> PayrollResult<Resolution<T>> {
        let total = candidates.len();
        let mut groups = group_candidates(candidates)?;
        let group_count = groups.len();
        let filter = OverrideFilter::new(wanted);

        let (groups, filtered_candidates) = match self.config.filter_anchor {
            FilterAnchor::MostSpecific => {
                order_groups(&mut groups);
                filter.apply(groups)
            }
            FilterAnchor::SuppliedFirst => {
                warn_unordered(&groups);
                let (mut kept, removed) = filter.apply(groups);
                order_groups(&mut kept);
                (kept, removed)
            }
        };

        let profile = T::profile();
        let precedence = self.config.map_precedence;
        let derived: Vec<DerivedGroup<T>> = groups
            .into_iter()
            .filter_map(|(key, ordered)| {
                tracing::trace!(kind = %T::KIND, %key, layers = ordered.len(), "folding group");
                DerivedGroup::from_folded(key, derive_group(&ordered, &profile, precedence))
            })
            .collect();

        let stats = ResolutionStats {
            candidates: total,
            groups: group_count,
            filtered_groups: group_count - derived.len(),
            filtered_candidates,
        };
        tracing::debug!(
            kind = %T::KIND,
            candidates = stats.candidates,
            groups = stats.groups,
            filtered_groups = stats.filtered_groups,
            "resolved derivation groups"
        );

        Ok(Resolution {
            kind: T::KIND,
            groups: derived,
            stats,
        })
    }

    /// Fetch candidates from a supplier and resolve them.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::InvalidArgument`] for an invalid query, or when the
    ///   supplier delivers no candidate list at all.
    /// - Any supplier error, unchanged.
    pub fn resolve_from<T, S>(&self, supplier: &S, query: &DerivationQuery) -> PayrollResult<Resolution<T>>
    where
        T: Derivable,
        S: CandidateSupplier<T> + ?Sized,
    {
        query.validate()?;
        let candidates = supplier.candidates(query)?.ok_or_else(|| {
            PayrollError::invalid(format!(
                "no {} candidate list delivered for payroll {}",
                T::KIND,
                query.payroll_id
            ))
        })?;
        self.resolve(candidates, query.override_type)
    }
}

fn order_groups<T: Derivable>(groups: &mut Groups<T>) {
    for group in groups.values_mut() {
        derivation_order(group);
    }
}

fn warn_unordered<T: Derivable>(groups: &Groups<T>) {
    for (key, group) in groups {
        if !is_derivation_ordered(group) {
            tracing::warn!(
                kind = %T::KIND,
                %key,
                "supplied group is not most-specific-first; override filter inspects a base layer"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapPrecedence;
    use crate::entities::{Collector, Lookup};
    use payroll_core::RegulationId;
    use rust_decimal::Decimal;

    fn rid(v: i64) -> RegulationId {
        RegulationId::new(v).unwrap()
    }

    fn collector(name: &str, threshold: Option<i64>, clusters: &[&str]) -> Collector {
        Collector {
            name: name.into(),
            threshold: threshold.map(Decimal::from),
            clusters: clusters.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn vacation_scenario() {
        let candidates = vec![
            Candidate::new(rid(1), 0, 0, collector("Vacation", None, &["base"])),
            Candidate::new(rid(2), 1, 0, collector("Vacation", Some(5), &["region"])),
        ];
        let resolution = DerivationResolver::default().resolve(candidates, None).unwrap();
        assert_eq!(resolution.len(), 1);
        let effective = &resolution.groups[0].effective;
        assert_eq!(effective.regulation_id, rid(2));
        assert_eq!(effective.object.threshold, Some(Decimal::from(5)));
        assert_eq!(effective.object.clusters, vec!["region", "base"]);
        assert_eq!(resolution.groups[0].depth(), 2);
    }

    #[test]
    fn base_layer_keeps_its_own_values() {
        let candidates = vec![
            Candidate::new(rid(1), 0, 0, collector("Vacation", None, &["base"])),
            Candidate::new(rid(2), 1, 0, collector("Vacation", Some(5), &["region"])),
        ];
        let resolution = DerivationResolver::default().resolve(candidates, None).unwrap();
        let base = &resolution.groups[0].base_layers[0];
        assert_eq!(base.object.threshold, None);
        assert_eq!(base.object.clusters, vec!["base"]);
    }

    #[test]
    fn override_gate_removes_whole_group() {
        let mut inactive = collector("Gross", None, &[]);
        inactive.override_type = OverrideType::Inactive;
        let candidates = vec![
            Candidate::new(rid(2), 1, 0, inactive),
            Candidate::new(rid(1), 0, 0, collector("Gross", Some(1), &[])),
            Candidate::new(rid(1), 0, 0, collector("Net", Some(2), &[])),
        ];
        let resolution = DerivationResolver::default()
            .resolve(candidates, Some(OverrideType::Active))
            .unwrap();
        assert_eq!(resolution.len(), 1);
        assert_eq!(resolution.groups[0].key, "Net");
        assert_eq!(resolution.stats.filtered_groups, 1);
        assert_eq!(resolution.stats.filtered_candidates, 2);
    }

    #[test]
    fn most_specific_anchor_ignores_supplied_order() {
        let mut inactive = collector("Gross", None, &[]);
        inactive.override_type = OverrideType::Inactive;
        // Base layer supplied first; the inactive override is most specific.
        let candidates = vec![
            Candidate::new(rid(1), 0, 0, collector("Gross", Some(1), &[])),
            Candidate::new(rid(2), 1, 0, inactive),
        ];
        let resolution = DerivationResolver::default()
            .resolve(candidates.clone(), Some(OverrideType::Active))
            .unwrap();
        assert!(resolution.is_empty());

        let supplied = DerivationResolver::new(ResolverConfig {
            filter_anchor: FilterAnchor::SuppliedFirst,
            ..Default::default()
        });
        let resolution = supplied.resolve(candidates, Some(OverrideType::Active)).unwrap();
        assert_eq!(resolution.len(), 1);
        assert_eq!(resolution.groups[0].effective.regulation_id, rid(2));
    }

    #[test]
    fn map_precedence_configurable() {
        let mut base = Lookup { name: "Canton".into(), ..Default::default() };
        base.attributes.insert("x".into(), serde_json::json!(1));
        let mut specific = Lookup { name: "Canton".into(), ..Default::default() };
        specific.attributes.insert("x".into(), serde_json::json!(2));
        let candidates = vec![
            Candidate::new(rid(1), 0, 0, base),
            Candidate::new(rid(2), 1, 0, specific),
        ];

        let default = DerivationResolver::default().resolve(candidates.clone(), None).unwrap();
        assert_eq!(default.groups[0].effective.object.attributes["x"], serde_json::json!(1));

        let fixed = DerivationResolver::new(ResolverConfig {
            map_precedence: MapPrecedence::MostSpecificWins,
            ..Default::default()
        });
        let resolution = fixed.resolve(candidates, None).unwrap();
        assert_eq!(resolution.groups[0].effective.object.attributes["x"], serde_json::json!(2));
    }

    #[test]
    fn get_and_flatten() {
        let candidates = vec![
            Candidate::new(rid(1), 0, 0, collector("B", None, &[])),
            Candidate::new(rid(1), 0, 0, collector("A", None, &[])),
            Candidate::new(rid(2), 1, 0, collector("A", Some(3), &[])),
        ];
        let resolution = DerivationResolver::default().resolve(candidates, None).unwrap();
        assert!(resolution.get(&"A".to_string()).is_some());
        assert!(resolution.get(&"C".to_string()).is_none());
        assert_eq!(resolution.effective_objects().len(), 2);
        assert_eq!(resolution.into_candidates().len(), 3);
    }

    #[test]
    fn invalid_key_rejected() {
        let candidates = vec![Candidate::new(rid(1), 0, 0, collector(" ", None, &[]))];
        let err = DerivationResolver::default().resolve(candidates, None).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidArgument(_)));
    }

    #[test]
    fn empty_input_is_empty_resolution() {
        let resolution = DerivationResolver::default()
            .resolve::<Collector>(Vec::new(), Some(OverrideType::Active))
            .unwrap();
        assert!(resolution.is_empty());
        assert_eq!(resolution.stats, ResolutionStats::default());
    }
}
