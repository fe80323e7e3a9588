//! # Regulation Objects
//!
//! The eleven derivable object kinds. Each module defines the object, its
//! natural key, and its profile table. The algorithm lives once in
//! [`crate::merge`]; nothing here folds values by hand.

mod case;
mod case_field;
mod case_relation;
mod collector;
mod lookup;
mod report;
mod script;
mod wage_type;

pub use case::{Case, CaseFieldReference, CaseSlot};
pub use case_field::{CaseField, LookupSettings};
pub use case_relation::{CaseRelation, CaseRelationKey};
pub use collector::Collector;
pub use lookup::{Lookup, LookupValue, LookupValueKey};
pub use report::{
    DataRelation, Report, ReportParameter, ReportParameterKey, ReportTemplate, ReportTemplateKey,
};
pub use script::Script;
pub use wage_type::{WageType, WageTypeNumber};

use serde::{Deserialize, Serialize};

use payroll_core::EntityKind;

use crate::profile::{Derivable, ProfileDescription};

/// All derivable objects defined by one regulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulationObjects {
    pub cases: Vec<Case>,
    pub case_fields: Vec<CaseField>,
    pub case_relations: Vec<CaseRelation>,
    pub collectors: Vec<Collector>,
    pub wage_types: Vec<WageType>,
    pub lookups: Vec<Lookup>,
    pub lookup_values: Vec<LookupValue>,
    pub reports: Vec<Report>,
    pub report_parameters: Vec<ReportParameter>,
    pub report_templates: Vec<ReportTemplate>,
    pub scripts: Vec<Script>,
}

impl RegulationObjects {
    /// Total number of objects across all kinds.
    pub fn len(&self) -> usize {
        self.cases.len()
            + self.case_fields.len()
            + self.case_relations.len()
            + self.collectors.len()
            + self.wage_types.len()
            + self.lookups.len()
            + self.lookup_values.len()
            + self.reports.len()
            + self.report_parameters.len()
            + self.report_templates.len()
            + self.scripts.len()
    }

    /// Whether the regulation defines no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Describe the profile of an entity kind.
pub fn describe_profile(kind: EntityKind) -> ProfileDescription {
    match kind {
        EntityKind::Case => Case::profile().describe(),
        EntityKind::CaseField => CaseField::profile().describe(),
        EntityKind::CaseRelation => CaseRelation::profile().describe(),
        EntityKind::Collector => Collector::profile().describe(),
        EntityKind::WageType => WageType::profile().describe(),
        EntityKind::Lookup => Lookup::profile().describe(),
        EntityKind::LookupValue => LookupValue::profile().describe(),
        EntityKind::Report => Report::profile().describe(),
        EntityKind::ReportParameter => ReportParameter::profile().describe(),
        EntityKind::ReportTemplate => ReportTemplate::profile().describe(),
        EntityKind::Script => Script::profile().describe(),
    }
}
