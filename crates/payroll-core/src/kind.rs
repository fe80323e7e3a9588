//! # Entity Kinds and Override Policy
//!
//! Defines [`EntityKind`], the single catalogue of regulation object kinds
//! that take part in derivation, and [`OverrideType`], the policy an author
//! declares on a named object at its most specific layer.
//!
//! Every `match` on `EntityKind` must be exhaustive. Adding a kind forces the
//! profile table and the CLI dispatch to handle it at compile time.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PayrollError;

/// All regulation object kinds resolved through the derivation engine.
///
/// | # | Kind | Natural key |
/// |---|------|-------------|
/// |  1 | Case | name |
/// |  2 | CaseField | name |
/// |  3 | CaseRelation | source case, source slot, target case, target slot |
/// |  4 | Collector | name |
/// |  5 | WageType | wage type number |
/// |  6 | Lookup | name |
/// |  7 | LookupValue | lookup name, value key |
/// |  8 | Report | name |
/// |  9 | ReportParameter | name |
/// | 10 | ReportTemplate | name |
/// | 11 | Script | name |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Input case (a form of related case fields).
    Case,
    /// A single field of a case.
    CaseField,
    /// Build/validate relation between two cases.
    CaseRelation,
    /// Accumulator of wage type results.
    Collector,
    /// Numbered payroll calculation line.
    WageType,
    /// Keyed lookup table.
    Lookup,
    /// A single row of a lookup table.
    LookupValue,
    /// Report definition.
    Report,
    /// Input parameter of a report.
    ReportParameter,
    /// Culture-specific report template.
    ReportTemplate,
    /// Shared script source.
    Script,
}

/// Total number of entity kinds. Used for compile-time assertions.
pub const ENTITY_KIND_COUNT: usize = 11;

impl EntityKind {
    /// Returns all entity kinds in canonical order.
    pub fn all() -> &'static [EntityKind] {
        &[
            Self::Case,
            Self::CaseField,
            Self::CaseRelation,
            Self::Collector,
            Self::WageType,
            Self::Lookup,
            Self::LookupValue,
            Self::Report,
            Self::ReportParameter,
            Self::ReportTemplate,
            Self::Script,
        ]
    }

    /// Returns the snake_case identifier for this kind.
    ///
    /// Matches the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::CaseField => "case_field",
            Self::CaseRelation => "case_relation",
            Self::Collector => "collector",
            Self::WageType => "wage_type",
            Self::Lookup => "lookup",
            Self::LookupValue => "lookup_value",
            Self::Report => "report",
            Self::ReportParameter => "report_parameter",
            Self::ReportTemplate => "report_template",
            Self::Script => "script",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = PayrollError;

    /// Parse an entity kind from its snake_case identifier.
    ///
    /// Kebab-case spellings (`case-field`) are accepted for CLI convenience.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PayrollError::InvalidArgument(format!("unknown entity kind: {s:?}")))
    }
}

/// Override policy declared by the author of a regulation object.
///
/// The policy is authored once, at the most specific layer of a named
/// object, and applies to its whole derivation chain: either every layer of
/// the object takes part in a resolution or none of them does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideType {
    /// The object takes part in derivation (default).
    #[default]
    Active,
    /// The object is switched off at this layer and hides its base layers.
    Inactive,
}

impl OverrideType {
    /// Returns all override types.
    pub fn all() -> &'static [OverrideType] {
        &[Self::Active, Self::Inactive]
    }

    /// Returns the snake_case identifier for this override type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for OverrideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideType {
    type Err = PayrollError;

    /// Parse an override type. Case-insensitive; anything other than
    /// `active`/`inactive` has no derivation semantics.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(PayrollError::UnsupportedOverride {
                requested: s.to_string(),
            }),
        }
    }
}
