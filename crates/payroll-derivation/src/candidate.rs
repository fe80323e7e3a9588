//! # Candidates and Derivation Order
//!
//! A [`Candidate`] is one layer's version of a named regulation object, as
//! delivered by the candidate supplier: the object itself plus the level and
//! priority of the payroll layer it came from.
//!
//! ## Derivation Order
//!
//! Within a group, candidates are ordered by level descending, then priority
//! descending: most specific first. Candidates with equal level and priority
//! have no defined order; the sort is stable, so they keep their input order.

use serde::{Deserialize, Serialize};

use payroll_core::{LayerRank, RegulationId};

/// One layer's version of a regulation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate<T> {
    /// Regulation contributing this version.
    pub regulation_id: RegulationId,
    /// Level of the contributing payroll layer.
    pub level: i32,
    /// Priority of the contributing payroll layer.
    pub priority: i32,
    /// The regulation object.
    #[serde(flatten)]
    pub object: T,
}

impl<T> Candidate<T> {
    /// Create a candidate.
    pub fn new(regulation_id: RegulationId, level: i32, priority: i32, object: T) -> Self {
        Self {
            regulation_id,
            level,
            priority,
            object,
        }
    }

    /// Create a candidate at a known layer rank.
    pub fn at(regulation_id: RegulationId, rank: LayerRank, object: T) -> Self {
        Self::new(regulation_id, rank.level, rank.priority, object)
    }

    /// The layer rank of this candidate.
    pub fn rank(&self) -> LayerRank {
        LayerRank::new(self.level, self.priority)
    }
}

/// Sort candidates into derivation order (most specific first).
///
/// The sort is stable: ties in level and priority keep their relative order.
pub fn derivation_order<T>(candidates: &mut [Candidate<T>]) {
    candidates.sort_by(|a, b| b.rank().cmp(&a.rank()));
}

/// Whether candidates are already in derivation order.
pub fn is_derivation_ordered<T>(candidates: &[Candidate<T>]) -> bool {
    candidates.windows(2).all(|pair| pair[0].rank() >= pair[1].rank())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(level: i32, priority: i32, tag: &str) -> Candidate<String> {
        Candidate::new(RegulationId::new(1).unwrap(), level, priority, tag.to_string())
    }

    fn tags(candidates: &[Candidate<String>]) -> Vec<&str> {
        candidates.iter().map(|c| c.object.as_str()).collect()
    }

    #[test]
    fn orders_by_level_then_priority_descending() {
        let mut candidates = vec![
            candidate(0, 0, "base"),
            candidate(2, 0, "company"),
            candidate(1, 3, "insurance"),
            candidate(1, 7, "country"),
        ];
        derivation_order(&mut candidates);
        assert_eq!(tags(&candidates), vec!["company", "country", "insurance", "base"]);
        assert!(is_derivation_ordered(&candidates));
    }

    #[test]
    fn equal_rank_keeps_input_order() {
        let mut candidates = vec![
            candidate(1, 1, "first"),
            candidate(0, 0, "base"),
            candidate(1, 1, "second"),
        ];
        derivation_order(&mut candidates);
        assert_eq!(tags(&candidates), vec!["first", "second", "base"]);
    }

    #[test]
    fn unordered_detected() {
        let candidates = vec![candidate(0, 0, "base"), candidate(1, 0, "override")];
        assert!(!is_derivation_ordered(&candidates));
    }

    #[test]
    fn empty_and_single_are_ordered() {
        assert!(is_derivation_ordered::<String>(&[]));
        assert!(is_derivation_ordered(&[candidate(4, 2, "only")]));
    }

    #[test]
    fn rank_combines_level_and_priority() {
        assert_eq!(candidate(3, 9, "x").rank(), LayerRank::new(3, 9));
    }
}
