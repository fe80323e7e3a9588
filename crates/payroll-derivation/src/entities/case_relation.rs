//! Case relation: build and validate rules between a source and a target case.
//!
//! The natural key is composite. Relations between the same two cases but
//! different slots are distinct objects and are never merged together.

use serde::{Deserialize, Serialize};

use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType, PayrollError, PayrollResult};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile, ObjectKey};

/// A relation between two cases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseRelation {
    pub id: Option<ObjectId>,
    pub source_case_name: String,
    pub source_case_slot: Option<String>,
    pub target_case_name: String,
    pub target_case_slot: Option<String>,
    pub override_type: OverrideType,
    pub source_case_name_localizations: Localizations,
    pub target_case_name_localizations: Localizations,
    pub build_expression: Option<String>,
    pub validate_expression: Option<String>,
    pub order: Option<i32>,
    pub build_actions: Vec<String>,
    pub validate_actions: Vec<String>,
    pub clusters: Vec<String>,
    pub attributes: Attributes,
}

/// Composite key of a case relation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseRelationKey {
    pub source_case_name: String,
    pub target_case_name: String,
    pub source_case_slot: Option<String>,
    pub target_case_slot: Option<String>,
}

impl std::fmt::Display for CaseRelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source_case_name)?;
        if let Some(slot) = &self.source_case_slot {
            write!(f, "#{slot}")?;
        }
        write!(f, "->{}", self.target_case_name)?;
        if let Some(slot) = &self.target_case_slot {
            write!(f, "#{slot}")?;
        }
        Ok(())
    }
}

impl ObjectKey for CaseRelationKey {
    fn validate(&self) -> PayrollResult<()> {
        if self.source_case_name.trim().is_empty() || self.target_case_name.trim().is_empty() {
            return Err(PayrollError::invalid(format!(
                "case relation {self} requires source and target case names"
            )));
        }
        let blank_slot = |slot: &Option<String>| slot.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank_slot(&self.source_case_slot) || blank_slot(&self.target_case_slot) {
            return Err(PayrollError::invalid(format!(
                "case relation {self} has a blank slot"
            )));
        }
        Ok(())
    }
}

impl Derivable for CaseRelation {
    type Key = CaseRelationKey;
    const KIND: EntityKind = EntityKind::CaseRelation;

    fn key(&self) -> CaseRelationKey {
        CaseRelationKey {
            source_case_name: self.source_case_name.clone(),
            target_case_name: self.target_case_name.clone(),
            source_case_slot: self.source_case_slot.clone(),
            target_case_slot: self.target_case_slot.clone(),
        }
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn clusters(&self) -> Option<&[String]> {
        Some(&self.clusters)
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::CaseRelation,
            field_rules!(CaseRelation {
                scalar source_case_name_localizations,
                scalar target_case_name_localizations,
                scalar build_expression,
                scalar validate_expression,
                scalar order,
                list build_actions,
                list validate_actions,
                list clusters,
                map attributes,
            }),
            &[
                "id",
                "source_case_name",
                "source_case_slot",
                "target_case_name",
                "target_case_slot",
                "override_type",
            ],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.case_relations
    }
}
