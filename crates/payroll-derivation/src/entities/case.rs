//! Case: an input form grouping related case fields.

use serde::{Deserialize, Serialize};

use payroll_core::values::{CaseCancellationType, CaseType};
use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile};

/// A payroll input case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Case {
    pub id: Option<ObjectId>,
    pub name: String,
    pub case_type: CaseType,
    pub override_type: OverrideType,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    pub default_reason: Option<String>,
    pub default_reason_localizations: Localizations,
    /// Case this case inherits its fields from.
    pub base_case: Option<String>,
    pub base_case_fields: Vec<CaseFieldReference>,
    pub cancellation_type: Option<CaseCancellationType>,
    pub available_expression: Option<String>,
    pub build_expression: Option<String>,
    pub validate_expression: Option<String>,
    pub available_actions: Vec<String>,
    pub build_actions: Vec<String>,
    pub validate_actions: Vec<String>,
    pub lookups: Vec<String>,
    pub slots: Vec<CaseSlot>,
    pub clusters: Vec<String>,
    pub attributes: Attributes,
}

/// Reference from a case to a field of its base case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFieldReference {
    pub name: String,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Named slot allowing a case to be entered several times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSlot {
    pub name: String,
    #[serde(default)]
    pub name_localizations: Localizations,
}

impl Derivable for Case {
    type Key = String;
    const KIND: EntityKind = EntityKind::Case;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn clusters(&self) -> Option<&[String]> {
        Some(&self.clusters)
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::Case,
            field_rules!(Case {
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar default_reason,
                scalar default_reason_localizations,
                scalar base_case,
                list base_case_fields,
                scalar cancellation_type,
                scalar available_expression,
                scalar build_expression,
                scalar validate_expression,
                list available_actions,
                list build_actions,
                list validate_actions,
                list lookups,
                list slots,
                list clusters,
                map attributes,
            }),
            &["id", "name", "case_type", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.cases
    }
}
