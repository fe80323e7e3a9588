//! Collector: accumulates wage type results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use payroll_core::values::{CollectMode, ValueType};
use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile};

/// A payroll collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collector {
    pub id: Option<ObjectId>,
    pub name: String,
    pub collect_mode: CollectMode,
    pub value_type: ValueType,
    /// Invert the collected result.
    pub negated: bool,
    pub override_type: OverrideType,
    pub name_localizations: Localizations,
    pub threshold: Option<Decimal>,
    pub min_result: Option<Decimal>,
    pub max_result: Option<Decimal>,
    pub start_expression: Option<String>,
    pub apply_expression: Option<String>,
    pub end_expression: Option<String>,
    pub collector_groups: Vec<String>,
    pub clusters: Vec<String>,
    pub attributes: Attributes,
}

impl Derivable for Collector {
    type Key = String;
    const KIND: EntityKind = EntityKind::Collector;

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
            EntityKind::Collector,
            field_rules!(Collector {
                scalar name_localizations,
                scalar threshold,
                scalar min_result,
                scalar max_result,
                scalar start_expression,
                scalar apply_expression,
                scalar end_expression,
                list collector_groups,
                list clusters,
                map attributes,
            }),
            &["id", "name", "collect_mode", "value_type", "negated", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.collectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergeStrategy;

    #[test]
    fn limits_are_scalar() {
        let profile = Collector::profile();
        for field in ["threshold", "min_result", "max_result"] {
            assert_eq!(profile.strategy_of(field), Some(MergeStrategy::ScalarOverride));
        }
        assert_eq!(profile.fields_with(MergeStrategy::ListUnion), vec!["collector_groups", "clusters"]);
    }

    #[test]
    fn decimal_threshold_from_yaml_number() {
        let collector: Collector = serde_yaml::from_str("name: Gross\nthreshold: 5\n").unwrap();
        assert_eq!(collector.threshold, Some(Decimal::from(5)));
    }
}
