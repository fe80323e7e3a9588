//! Reports, report parameters, and report templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use payroll_core::values::ValueType;
use payroll_core::{
    Attributes, EntityKind, Localizations, ObjectId, OverrideType, PayrollError, PayrollResult,
};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile, ObjectKey};

/// A report definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub id: Option<ObjectId>,
    pub name: String,
    pub override_type: OverrideType,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    pub category: Option<String>,
    /// Query name → query expression.
    pub queries: BTreeMap<String, String>,
    pub relations: Vec<DataRelation>,
    pub build_expression: Option<String>,
    pub start_expression: Option<String>,
    pub end_expression: Option<String>,
    pub clusters: Vec<String>,
    pub attributes: Attributes,
}

/// Relation between two report query tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRelation {
    pub name: String,
    pub parent_table: String,
    pub parent_column: String,
    pub child_table: String,
    pub child_column: String,
}

impl Derivable for Report {
    type Key = String;
    const KIND: EntityKind = EntityKind::Report;

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
            EntityKind::Report,
            field_rules!(Report {
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar category,
                map queries,
                list relations,
                scalar build_expression,
                scalar start_expression,
                scalar end_expression,
                list clusters,
                map attributes,
            }),
            &["id", "name", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.reports
    }
}

/// An input parameter of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParameter {
    pub id: Option<ObjectId>,
    /// Name of the report owning this parameter.
    pub report_name: String,
    pub name: String,
    pub value_type: ValueType,
    pub mandatory: bool,
    pub hidden: bool,
    pub override_type: OverrideType,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    pub value: Option<String>,
    pub parameter_type: Option<String>,
    pub attributes: Attributes,
}

/// Key of a report parameter: parameters are scoped to their report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportParameterKey {
    pub report_name: String,
    pub name: String,
}

impl std::fmt::Display for ReportParameterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.report_name, self.name)
    }
}

impl ObjectKey for ReportParameterKey {
    fn validate(&self) -> PayrollResult<()> {
        require_report(&self.report_name, self)?;
        if self.name.trim().is_empty() {
            return Err(PayrollError::invalid(format!("report parameter {self} has a blank name")));
        }
        Ok(())
    }

    fn filter_name(&self) -> String {
        self.name.clone()
    }
}

impl Derivable for ReportParameter {
    type Key = ReportParameterKey;
    const KIND: EntityKind = EntityKind::ReportParameter;

    fn key(&self) -> ReportParameterKey {
        ReportParameterKey {
            report_name: self.report_name.clone(),
            name: self.name.clone(),
        }
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::ReportParameter,
            field_rules!(ReportParameter {
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar value,
                scalar parameter_type,
                map attributes,
            }),
            &["id", "report_name", "name", "value_type", "mandatory", "hidden", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.report_parameters
    }
}

/// A culture-specific report template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTemplate {
    pub id: Option<ObjectId>,
    /// Name of the report owning this template.
    pub report_name: String,
    pub name: String,
    /// Culture tag (e.g. `de-CH`). Empty for the invariant culture.
    pub culture: String,
    pub override_type: OverrideType,
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub schema: Option<String>,
    pub resource: Option<String>,
    pub attributes: Attributes,
}

/// Key of a report template: one group per report, name and culture.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportTemplateKey {
    pub report_name: String,
    pub name: String,
    pub culture: String,
}

impl std::fmt::Display for ReportTemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}[{}]", self.report_name, self.name, self.culture)
    }
}

impl ObjectKey for ReportTemplateKey {
    fn validate(&self) -> PayrollResult<()> {
        require_report(&self.report_name, self)?;
        if self.name.trim().is_empty() {
            return Err(PayrollError::invalid(format!("report template {self} has a blank name")));
        }
        Ok(())
    }

    fn filter_name(&self) -> String {
        self.name.clone()
    }
}

impl Derivable for ReportTemplate {
    type Key = ReportTemplateKey;
    const KIND: EntityKind = EntityKind::ReportTemplate;

    fn key(&self) -> ReportTemplateKey {
        ReportTemplateKey {
            report_name: self.report_name.clone(),
            name: self.name.clone(),
            culture: self.culture.trim().to_string(),
        }
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::ReportTemplate,
            field_rules!(ReportTemplate {
                scalar content,
                scalar content_type,
                scalar schema,
                scalar resource,
                map attributes,
            }),
            &["id", "report_name", "name", "culture", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.report_templates
    }
}

fn require_report(report_name: &str, key: &impl std::fmt::Display) -> PayrollResult<()> {
    if report_name.trim().is_empty() {
        return Err(PayrollError::invalid(format!("{key} has no owning report")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergeStrategy;

    #[test]
    fn queries_overlay_and_relations_accumulate() {
        let profile = Report::profile();
        assert_eq!(profile.strategy_of("queries"), Some(MergeStrategy::MapOverlay));
        assert_eq!(profile.strategy_of("relations"), Some(MergeStrategy::ListUnion));
    }

    #[test]
    fn parameter_flags_are_verbatim() {
        let profile = ReportParameter::profile();
        assert!(profile.verbatim_fields().contains(&"mandatory"));
        assert_eq!(profile.strategy_of("mandatory"), None);
    }

    #[test]
    fn template_culture_is_verbatim() {
        assert_eq!(ReportTemplate::profile().strategy_of("culture"), None);
        assert_eq!(
            ReportTemplate::profile().strategy_of("content"),
            Some(MergeStrategy::ScalarOverride)
        );
    }

    #[test]
    fn parameter_key_is_scoped_to_report() {
        let payslip = ReportParameter {
            report_name: "Payslip".into(),
            name: "Year".into(),
            ..Default::default()
        };
        let journal = ReportParameter {
            report_name: "Journal".into(),
            ..payslip.clone()
        };
        assert_ne!(payslip.key(), journal.key());
        assert_eq!(payslip.key().to_string(), "Payslip.Year");
        assert_eq!(payslip.key().filter_name(), "Year");
    }

    #[test]
    fn template_key_includes_culture() {
        let german = ReportTemplate {
            report_name: "Payslip".into(),
            name: "Payslip".into(),
            culture: "de-CH".into(),
            ..Default::default()
        };
        let english = ReportTemplate {
            culture: "en-US".into(),
            ..german.clone()
        };
        assert_ne!(german.key(), english.key());
        assert_eq!(german.key().to_string(), "Payslip.Payslip[de-CH]");
    }

    #[test]
    fn ownerless_rows_rejected() {
        let orphan = ReportParameter {
            name: "Year".into(),
            ..Default::default()
        };
        assert!(orphan.key().validate().is_err());
        let blank = ReportTemplate {
            report_name: "Payslip".into(),
            ..Default::default()
        };
        assert!(blank.key().validate().is_err());
    }
}
