//! # Override Filter
//!
//! Drops whole groups whose override policy does not match a requested
//! [`OverrideType`]. The policy of a named object is authored once, at its
//! most specific layer, and applies to its whole derivation chain: a group
//! is either kept with all of its candidates or removed with all of them.
//!
//! The filter inspects the *first* candidate of each group. Which candidate
//! that is depends on [`FilterAnchor`](crate::config::FilterAnchor): the
//! resolver either sorts groups into derivation order before filtering or
//! trusts the supplier's row order.

use payroll_core::OverrideType;

use crate::candidate::Candidate;
use crate::group::Groups;
use crate::profile::Derivable;

/// Group filter on the declared override type.
///
/// Reading each group's head exactly as supplied is the compatibility mode,
/// [`FilterAnchor::SuppliedFirst`](crate::config::FilterAnchor::SuppliedFirst).
/// The default resolver sorts groups into derivation order first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideFilter {
    wanted: Option<OverrideType>,
}

impl OverrideFilter {
    /// Create a filter. `None` admits every group.
    pub fn new(wanted: Option<OverrideType>) -> Self {
        Self { wanted }
    }

    /// The requested override type, if any.
    pub fn wanted(&self) -> Option<OverrideType> {
        self.wanted
    }

    /// Whether a group passes the filter, judged by its first candidate.
    pub fn admits<T: Derivable>(&self, group: &[Candidate<T>]) -> bool {
        match (self.wanted, group.first()) {
            (None, _) | (Some(_), None) => true,
            (Some(wanted), Some(head)) => head.object.override_type() == wanted,
        }
    }

    /// Remove every group that does not pass. Returns the surviving groups
    /// and the removed groups' candidate count.
    pub fn apply<T: Derivable>(&self, groups: Groups<T>) -> (Groups<T>, usize) {
        if self.wanted.is_none() {
            return (groups, 0);
        }
        let mut removed = 0;
        let kept = groups
            .into_iter()
            .filter(|(key, group)| {
                let admitted = self.admits(group);
                if !admitted {
                    tracing::trace!(kind = %T::KIND, %key, candidates = group.len(), "override filter removed group");
                    removed += group.len();
                }
                admitted
            })
            .collect();
        (kept, removed)
    }
}
