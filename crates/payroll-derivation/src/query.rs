//! # Derivation Query
//!
//! Parameters of one resolution request: which payroll, at which moment,
//! and how the candidate list is narrowed. Date, cluster, and key narrowing
//! are applied by the candidate supplier; the override type is applied by
//! the resolver itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use payroll_core::{OverrideType, PayrollError, PayrollId, PayrollResult, TenantId};

/// Cluster include/exclude sets.
///
/// An object passes when it carries at least one included cluster (or no
/// include set is given) and none of the excluded clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSet {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ClusterSet {
    /// Whether no narrowing is requested.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Whether an object with the given clusters passes.
    pub fn admits(&self, clusters: &[String]) -> bool {
        let included = self.include.is_empty() || clusters.iter().any(|c| self.include.contains(c));
        let excluded = clusters.iter().any(|c| self.exclude.contains(c));
        included && !excluded
    }
}

/// One resolution request against one payroll at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationQuery {
    pub tenant_id: TenantId,
    pub payroll_id: PayrollId,
    /// Moment the regulations must be valid at. `None` means no date filter.
    #[serde(default)]
    pub evaluation_date: Option<DateTime<Utc>>,
    /// Keep only groups whose override type matches.
    #[serde(default)]
    pub override_type: Option<OverrideType>,
    /// Narrow to these names, numbers or keys.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clusters: ClusterSet,
}

impl DerivationQuery {
    /// A query without any narrowing.
    pub fn new(tenant_id: TenantId, payroll_id: PayrollId) -> Self {
        Self {
            tenant_id,
            payroll_id,
            evaluation_date: None,
            override_type: None,
            keys: Vec::new(),
            clusters: ClusterSet::default(),
        }
    }

    /// Require regulations to be valid at `moment`.
    pub fn at(mut self, moment: DateTime<Utc>) -> Self {
        self.evaluation_date = Some(moment);
        self
    }

    /// Keep only groups with this override type.
    pub fn with_override_type(mut self, override_type: OverrideType) -> Self {
        self.override_type = Some(override_type);
        self
    }

    /// Narrow to the given keys.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Apply cluster include/exclude sets.
    pub fn with_clusters(mut self, clusters: ClusterSet) -> Self {
        self.clusters = clusters;
        self
    }

    /// Whether an object key passes the key narrowing.
    pub fn admits_key(&self, filter_name: &str) -> bool {
        self.keys.is_empty() || self.keys.iter().any(|k| k.trim() == filter_name)
    }

    /// Validate the query.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidArgument`] for blank key or cluster
    /// filters.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.keys.iter().any(|k| k.trim().is_empty()) {
            return Err(PayrollError::invalid("key filter must not contain blank names"));
        }
        let mut clusters = self.clusters.include.iter().chain(&self.clusters.exclude);
        if clusters.any(|c| c.trim().is_empty()) {
            return Err(PayrollError::invalid("cluster filter must not contain blank names"));
        }
        Ok(())
    }
}
