//! # Candidate Supply
//!
//! The resolver consumes flat candidate lists. Where they come from is
//! behind the [`CandidateSupplier`] trait; [`RegulationStore`] is the
//! in-memory implementation backed by a regulation bundle file.
//!
//! ## Bundle Format
//!
//! ```yaml
//! payroll:
//!   id: 1
//!   tenant_id: 1
//!   name: Monthly
//!   layers:
//!     - { level: 0, regulation_id: 10 }
//!     - { level: 1, regulation_id: 20 }
//! regulations:
//!   - regulation: { id: 10, tenant_id: 1, name: CH.Base }
//!     objects:
//!       collectors:
//!         - { name: Vacation, clusters: [base] }
//!   - regulation: { id: 20, tenant_id: 1, name: Company }
//!     objects:
//!       collectors:
//!         - { name: Vacation, threshold: 5 }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use payroll_core::{Payroll, PayrollError, PayrollResult, Regulation, RegulationId};

use crate::candidate::Candidate;
use crate::entities::RegulationObjects;
use crate::profile::{Derivable, ObjectKey};
use crate::query::DerivationQuery;

/// Source of candidate lists for one entity kind.
pub trait CandidateSupplier<T: Derivable> {
    /// Deliver every candidate matching the query.
    ///
    /// `Ok(None)` means no candidate list could be produced at all, which the
    /// resolver rejects. An empty list is a valid answer.
    fn candidates(&self, query: &DerivationQuery) -> PayrollResult<Option<Vec<Candidate<T>>>>;
}

/// One regulation and the objects it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationEntry {
    pub regulation: Regulation,
    #[serde(default)]
    pub objects: RegulationObjects,
}

/// A payroll together with the regulations it stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationBundle {
    pub payroll: Payroll,
    #[serde(default)]
    pub regulations: Vec<RegulationEntry>,
}

/// In-memory candidate supplier over a validated bundle.
#[derive(Debug, Clone)]
pub struct RegulationStore {
    bundle: RegulationBundle,
    index: HashMap<RegulationId, usize>,
}

impl RegulationStore {
    /// Build a store, validating the payroll and its regulation references.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::InvalidArgument`] for an invalid payroll or a
    ///   regulation listed twice.
    /// - [`PayrollError::UnknownReference`] / [`PayrollError::ForeignRegulation`]
    ///   for layer references that do not check out.
    pub fn new(bundle: RegulationBundle) -> PayrollResult<Self> {
        bundle.payroll.validate()?;

        let mut index = HashMap::with_capacity(bundle.regulations.len());
        for (position, entry) in bundle.regulations.iter().enumerate() {
            if index.insert(entry.regulation.id, position).is_some() {
                return Err(PayrollError::invalid(format!(
                    "regulation {} is listed twice",
                    entry.regulation.id
                )));
            }
        }

        let regulations: Vec<Regulation> =
            bundle.regulations.iter().map(|e| e.regulation.clone()).collect();
        bundle.payroll.verify_regulations(&regulations)?;

        tracing::debug!(
            payroll = %bundle.payroll.id,
            regulations = bundle.regulations.len(),
            layers = bundle.payroll.layers.len(),
            "regulation store ready"
        );
        Ok(Self { bundle, index })
    }

    /// Parse a bundle from YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> PayrollResult<Self> {
        let bundle: RegulationBundle =
            serde_yaml::from_str(text).map_err(|e| PayrollError::Serialization(e.to_string()))?;
        Self::new(bundle)
    }

    /// Load a bundle file. `.json` files are read as JSON, anything else as
    /// YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Io`] if the file cannot be read,
    /// [`PayrollError::Serialization`] if it does not parse, and any
    /// validation error from [`RegulationStore::new`].
    pub fn from_path(path: &Path) -> PayrollResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<RegulationBundle, String> = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        let bundle = parsed
            .map_err(|detail| PayrollError::Serialization(format!("{}: {detail}", path.display())))?;
        Self::new(bundle)
    }

    /// The payroll this store serves.
    pub fn payroll(&self) -> &Payroll {
        &self.bundle.payroll
    }

    /// The bundled regulations.
    pub fn regulations(&self) -> impl Iterator<Item = &Regulation> {
        self.bundle.regulations.iter().map(|entry| &entry.regulation)
    }

    /// The objects a regulation defines.
    pub fn objects(&self, regulation_id: RegulationId) -> Option<&RegulationObjects> {
        self.index
            .get(&regulation_id)
            .map(|&position| &self.bundle.regulations[position].objects)
    }

    fn check_scope(&self, query: &DerivationQuery) -> PayrollResult<()> {
        let payroll = &self.bundle.payroll;
        if query.payroll_id != payroll.id {
            return Err(PayrollError::unknown("payroll", query.payroll_id, "regulation store"));
        }
        if query.tenant_id != payroll.tenant_id {
            return Err(PayrollError::unknown(
                "payroll",
                query.payroll_id,
                format!("tenant {}", query.tenant_id),
            ));
        }
        Ok(())
    }
}

impl<T: Derivable> CandidateSupplier<T> for RegulationStore {
    /// Candidates are delivered most specific layer first.
    fn candidates(&self, query: &DerivationQuery) -> PayrollResult<Option<Vec<Candidate<T>>>> {
        self.check_scope(query)?;

        let mut candidates = Vec::new();
        for layer in self.bundle.payroll.layers_by_specificity() {
            let Some(&position) = self.index.get(&layer.regulation_id) else {
                continue;
            };
            let entry = &self.bundle.regulations[position];
            if let Some(moment) = query.evaluation_date {
                if !entry.regulation.is_valid_at(moment) {
                    tracing::trace!(regulation = %entry.regulation.name, %moment, "regulation not yet valid");
                    continue;
                }
            }

            let admitted = T::select(&entry.objects).iter().filter(|object| {
                query.admits_key(&object.key().filter_name())
                    && object.clusters().map_or(true, |c| query.clusters.admits(c))
            });
            candidates.extend(admitted.map(|object| Candidate::at(layer.regulation_id, layer.rank(), object.clone())));
        }

        tracing::trace!(kind = %T::KIND, candidates = candidates.len(), "supplied candidates");
        Ok(Some(candidates))
    }
}
