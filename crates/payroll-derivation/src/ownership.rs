//! Candidate ownership checks.
//!
//! A candidate list assembled outside [`RegulationStore`](crate::RegulationStore)
//! can be checked against the payroll it claims to describe: every candidate
//! must come from a regulation stacked in the payroll, at one of the ranks
//! that regulation is stacked at.

use payroll_core::{Payroll, PayrollError, PayrollResult};

use crate::candidate::Candidate;

/// Verify that every candidate belongs to a layer of `payroll`.
///
/// # Errors
///
/// Returns [`PayrollError::UnknownReference`] for the first candidate whose
/// regulation is not stacked in the payroll, or whose level and priority
/// match none of that regulation's layers.
pub fn verify_ownership<T>(candidates: &[Candidate<T>], payroll: &Payroll) -> PayrollResult<()> {
    for candidate in candidates {
        // Fails with UnknownReference when the regulation is not stacked.
        payroll.layer_of(candidate.regulation_id)?;

        let rank = candidate.rank();
        let stacked = payroll
            .layers
            .iter()
            .any(|layer| layer.regulation_id == candidate.regulation_id && layer.rank() == rank);
        if !stacked {
            return Err(PayrollError::unknown(
                "layer",
                rank,
                format!("regulation {} in payroll {}", candidate.regulation_id, payroll.id),
            ));
        }
    }
    Ok(())
}
