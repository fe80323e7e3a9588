//! # Payroll Layer Stack
//!
//! A [`Payroll`] references an ordered stack of [`PayrollLayer`]s. Each
//! layer points at a [`Regulation`] and carries the derivation `level` and
//! the tie-break `priority`:
//!
//! ```text
//! Payroll "CH Monthly"
//! ├── layer level=1 priority=1 → regulation "CH.Base"      (least specific)
//! ├── layer level=2 priority=1 → regulation "CH.Insurance"
//! └── layer level=3 priority=1 → regulation "ACME.Company" (most specific)
//! ```
//!
//! The payroll itself performs no derivation. It answers two questions for
//! callers: which [`LayerRank`] a regulation contributes at, and whether
//! every referenced regulation exists and may be used by the payroll's
//! tenant.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};
use crate::identity::{PayrollId, RegulationId, TenantId};

/// Position of a layer in the derivation order.
///
/// Ordered by `level`, then `priority`. A greater rank is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerRank {
    /// Regulation stack depth. Larger is more specific.
    pub level: i32,
    /// Tie-break within a level. Larger is more specific.
    pub priority: i32,
}

impl LayerRank {
    /// Create a layer rank.
    pub fn new(level: i32, priority: i32) -> Self {
        Self { level, priority }
    }
}

impl std::fmt::Display for LayerRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.level, self.priority)
    }
}

/// One layer of a payroll's regulation stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLayer {
    /// Derivation level.
    pub level: i32,
    /// Tie-break priority within the level.
    #[serde(default)]
    pub priority: i32,
    /// The regulation contributing at this layer.
    pub regulation_id: RegulationId,
}

impl PayrollLayer {
    /// The rank of this layer in the derivation order.
    pub fn rank(&self) -> LayerRank {
        LayerRank::new(self.level, self.priority)
    }
}

/// A named, versioned bundle of payroll definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    /// Regulation identifier.
    pub id: RegulationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Regulation name (e.g. `CH.Base`).
    pub name: String,
    /// Whether payrolls of other tenants may reference this regulation.
    #[serde(default)]
    pub shared_regulation: bool,
    /// First moment the regulation is in effect. `None` means always.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
}

impl Regulation {
    /// Whether the regulation is in effect at the given moment.
    pub fn is_valid_at(&self, moment: DateTime<Utc>) -> bool {
        self.valid_from.map_or(true, |from| from <= moment)
    }
}

/// A payroll and its regulation layer stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Payroll identifier.
    pub id: PayrollId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Human-readable name.
    pub name: String,
    /// Regulation layers in any order; derivation order comes from the ranks.
    #[serde(default)]
    pub layers: Vec<PayrollLayer>,
}

impl Payroll {
    /// Validate the layer stack, returning a list of error messages.
    ///
    /// Checks:
    /// - Non-blank payroll name
    /// - At least one layer
    /// - No regulation appears twice at the same rank
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(format!("Payroll {} has a blank name", self.id));
        }

        if self.layers.is_empty() {
            errors.push(format!("Payroll {} has no layers", self.id));
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert((layer.rank(), layer.regulation_id)) {
                errors.push(format!(
                    "Duplicate layer {} for regulation {}",
                    layer.rank(),
                    layer.regulation_id
                ));
            }
        }

        errors
    }

    /// Validate the layer stack.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidArgument`] listing every problem found.
    pub fn validate(&self) -> PayrollResult<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PayrollError::InvalidArgument(errors.join("; ")))
        }
    }

    /// Return the layer through which a regulation contributes.
    ///
    /// When a regulation is stacked more than once, the most specific layer
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::UnknownReference`] if the regulation is not
    /// part of this payroll.
    pub fn layer_of(&self, regulation_id: RegulationId) -> PayrollResult<&PayrollLayer> {
        self.layers
            .iter()
            .filter(|layer| layer.regulation_id == regulation_id)
            .max_by_key(|layer| layer.rank())
            .ok_or_else(|| {
                PayrollError::unknown("regulation", regulation_id, format!("payroll {}", self.id))
            })
    }

    /// Cross-check the regulations referenced by the layer stack.
    ///
    /// Every layer must reference a regulation in `regulations`, and a
    /// regulation owned by another tenant must be flagged as shared.
    ///
    /// # Errors
    ///
    /// - [`PayrollError::UnknownReference`] for a missing regulation.
    /// - [`PayrollError::ForeignRegulation`] for an unshared foreign regulation.
    pub fn verify_regulations(&self, regulations: &[Regulation]) -> PayrollResult<()> {
        let by_id: HashMap<RegulationId, &Regulation> =
            regulations.iter().map(|r| (r.id, r)).collect();

        for layer in &self.layers {
            let regulation = by_id.get(&layer.regulation_id).ok_or_else(|| {
                PayrollError::unknown(
                    "regulation",
                    layer.regulation_id,
                    format!("payroll {} layer {}", self.id, layer.rank()),
                )
            })?;

            if regulation.tenant_id != self.tenant_id && !regulation.shared_regulation {
                return Err(PayrollError::ForeignRegulation {
                    regulation: regulation.name.clone(),
                    owner: regulation.tenant_id.to_string(),
                    tenant: self.tenant_id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Layers sorted most specific first.
    pub fn layers_by_specificity(&self) -> Vec<&PayrollLayer> {
        let mut layers: Vec<_> = self.layers.iter().collect();
        layers.sort_by(|a, b| b.rank().cmp(&a.rank()));
        layers
    }
}
