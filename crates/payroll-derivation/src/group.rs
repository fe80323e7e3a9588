//! # Grouper
//!
//! Partitions a flat candidate list into groups sharing one natural key.
//! Pure partitioning: the only field inspected is the key, and candidates
//! keep their input relative order within each group.

use std::collections::BTreeMap;

use payroll_core::PayrollResult;

use crate::candidate::Candidate;
use crate::profile::{Derivable, ObjectKey};

/// Candidate groups keyed by natural key.
pub type Groups<T> = BTreeMap<<T as Derivable>::Key, Vec<Candidate<T>>>;

/// Group candidates by their natural key.
///
/// # Errors
///
/// Returns [`payroll_core::PayrollError::InvalidArgument`] if any candidate
/// has a blank or otherwise invalid key.
pub fn group_candidates<T: Derivable>(candidates: Vec<Candidate<T>>) -> PayrollResult<Groups<T>> {
    let mut groups: Groups<T> = BTreeMap::new();
    for candidate in candidates {
        let key = candidate.object.key();
        key.validate()?;
        groups.entry(key).or_default().push(candidate);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Lookup;
    use payroll_core::{PayrollError, RegulationId};

    fn lookup(name: &str, regulation: i64, level: i32) -> Candidate<Lookup> {
        Candidate::new(
            RegulationId::new(regulation).unwrap(),
            level,
            0,
            Lookup {
                name: name.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn groups_by_key_preserving_order() {
        let groups = group_candidates(vec![
            lookup("Canton", 1, 0),
            lookup("TaxRate", 1, 0),
            lookup("Canton", 2, 1),
            lookup("Canton", 3, 2),
        ])
        .unwrap();

        assert_eq!(groups.len(), 2);
        let canton: Vec<i64> = groups["Canton"]
            .iter()
            .map(|c| c.regulation_id.get())
            .collect();
        assert_eq!(canton, vec![1, 2, 3]);
        assert_eq!(groups["TaxRate"].len(), 1);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_candidates::<Lookup>(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn blank_key_rejected() {
        let err = group_candidates(vec![lookup("  ", 1, 0)]).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidArgument(_)));
    }
}
