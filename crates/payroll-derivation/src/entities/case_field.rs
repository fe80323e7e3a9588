//! Case field: a single typed input of a case.

use serde::{Deserialize, Serialize};

use payroll_core::values::{TimeType, ValueScope, ValueType};
use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType};

use crate::entities::RegulationObjects;
use crate::merge::Unset;
use crate::profile::{field_rules, Derivable, EntityProfile};

/// A field of a payroll case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseField {
    pub id: Option<ObjectId>,
    pub name: String,
    /// Owning case. Fixed when the field is created.
    pub case_name: Option<String>,
    pub value_type: ValueType,
    pub time_type: TimeType,
    pub override_type: OverrideType,
    pub value_mandatory: bool,
    pub end_mandatory: bool,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    pub value_scope: Option<ValueScope>,
    pub order: Option<i32>,
    pub default_start: Option<String>,
    pub default_end: Option<String>,
    pub default_value: Option<String>,
    pub lookup_settings: Option<LookupSettings>,
    pub tags: Vec<String>,
    pub clusters: Vec<String>,
    pub build_actions: Vec<String>,
    pub validate_actions: Vec<String>,
    pub attributes: Attributes,
    /// Attributes applied to every value entered for the field.
    pub value_attributes: Attributes,
}

/// Binding of a case field to a lookup for value selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSettings {
    pub lookup_name: String,
    #[serde(default)]
    pub value_field_name: Option<String>,
    #[serde(default)]
    pub text_field_name: Option<String>,
}

/// Settings without a lookup name bind nothing.
impl Unset for LookupSettings {
    fn is_unset(&self) -> bool {
        self.lookup_name.trim().is_empty()
    }
}

impl Derivable for CaseField {
    type Key = String;
    const KIND: EntityKind = EntityKind::CaseField;

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
            EntityKind::CaseField,
            field_rules!(CaseField {
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar value_scope,
                scalar order,
                scalar default_start,
                scalar default_end,
                scalar default_value,
                scalar lookup_settings,
                list tags,
                list clusters,
                list build_actions,
                list validate_actions,
                map attributes,
                map value_attributes,
            }),
            &[
                "id",
                "name",
                "case_name",
                "value_type",
                "time_type",
                "override_type",
                "value_mandatory",
                "end_mandatory",
            ],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.case_fields
    }
}
