//! # Validate Subcommand
//!
//! Checks a regulation bundle without resolving anything:
//!
//! - the payroll layer stack (name, layers, duplicate ranks),
//! - every layer's regulation reference and tenant sharing,
//! - the natural key of every object, per entity kind.
//!
//! Prints a per-kind summary and exits with `2` on the first failure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use payroll_core::{EntityKind, PayrollError};
use payroll_derivation::{group_candidates, CandidateSupplier, Derivable, DerivationQuery, RegulationStore};

use crate::{dispatch_kind, EXIT_INVALID};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Regulation bundle (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub bundle: PathBuf,
}

/// Object counts of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: EntityKind,
    pub candidates: usize,
    pub groups: usize,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let store = match RegulationStore::from_path(&args.bundle) {
        Ok(store) => store,
        Err(err @ (PayrollError::Io(_) | PayrollError::Serialization(_))) => {
            return Err(err).with_context(|| format!("failed to load bundle {}", args.bundle.display()));
        }
        Err(err) => {
            println!("FAIL {}: {err}", args.bundle.display());
            return Ok(EXIT_INVALID);
        }
    };

    let payroll = store.payroll();
    println!(
        "payroll {} '{}': {} layers, {} regulations",
        payroll.id,
        payroll.name,
        payroll.layers.len(),
        store.regulations().count()
    );

    match summarize(&store) {
        Ok(summaries) => {
            for summary in summaries.iter().filter(|s| s.candidates > 0) {
                println!(
                    "  {:<18} {:>5} objects {:>5} keys",
                    summary.kind.as_str(),
                    summary.candidates,
                    summary.groups
                );
            }
            println!("OK");
            Ok(0)
        }
        Err(err) => {
            println!("FAIL {err}");
            Ok(EXIT_INVALID)
        }
    }
}

/// Group the objects of every entity kind, failing on the first invalid key.
pub fn summarize(store: &RegulationStore) -> Result<Vec<KindSummary>, PayrollError> {
    let payroll = store.payroll();
    let query = DerivationQuery::new(payroll.tenant_id, payroll.id);
    EntityKind::all()
        .iter()
        .map(|kind| dispatch_kind!(*kind, summarize_kind(store, &query)))
        .collect()
}

fn summarize_kind<T: Derivable>(
    store: &RegulationStore,
    query: &DerivationQuery,
) -> Result<KindSummary, PayrollError> {
    let candidates: Vec<_> = CandidateSupplier::<T>::candidates(store, query)?.unwrap_or_default();
    let count = candidates.len();
    let groups = group_candidates(candidates)?;
    Ok(KindSummary {
        kind: T::KIND,
        candidates: count,
        groups: groups.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bundle_file, BUNDLE};

    #[test]
    fn valid_bundle_passes() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs { bundle: bundle_file(&dir, BUNDLE) };
        assert_eq!(run_validate(&args).unwrap(), 0);
    }

    #[test]
    fn summary_counts_objects_and_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegulationStore::from_path(&bundle_file(&dir, BUNDLE)).unwrap();
        let summaries = summarize(&store).unwrap();
        let collectors = summaries.iter().find(|s| s.kind == EntityKind::Collector).unwrap();
        assert_eq!(collectors.candidates, 4);
        assert_eq!(collectors.groups, 2);
        assert_eq!(summaries.len(), EntityKind::all().len());
    }

    #[test]
    fn missing_regulation_is_a_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let text = BUNDLE.replace("regulation_id: 20", "regulation_id: 21");
        let args = ValidateArgs { bundle: bundle_file(&dir, &text) };
        assert_eq!(run_validate(&args).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn blank_key_is_a_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let text = BUNDLE.replace("name: Gross, clusters", "name: ' ', clusters");
        let args = ValidateArgs { bundle: bundle_file(&dir, &text) };
        assert_eq!(run_validate(&args).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn unparsable_bundle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs { bundle: bundle_file(&dir, "payroll: [") };
        assert!(run_validate(&args).is_err());
    }
}
