//! Wage type: a numbered calculation line of the payroll.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use payroll_core::values::ValueType;
use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType, PayrollError, PayrollResult};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile, ObjectKey};

/// Wage type number, e.g. `1000` or `6500.1`.
///
/// Numbers compare by value: `1000` and `1000.00` identify the same wage type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WageTypeNumber(pub Decimal);

impl WageTypeNumber {
    /// The number without trailing zeros.
    pub fn normalized(&self) -> Decimal {
        self.0.normalize()
    }
}

impl PartialEq for WageTypeNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for WageTypeNumber {}

impl PartialOrd for WageTypeNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WageTypeNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::hash::Hash for WageTypeNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl std::fmt::Display for WageTypeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

impl ObjectKey for WageTypeNumber {
    fn validate(&self) -> PayrollResult<()> {
        if self.0 <= Decimal::ZERO {
            return Err(PayrollError::invalid(format!(
                "wage type number must be positive, got {self}"
            )));
        }
        Ok(())
    }
}

/// A payroll wage type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageType {
    pub id: Option<ObjectId>,
    pub wage_type_number: WageTypeNumber,
    pub value_type: ValueType,
    pub override_type: OverrideType,
    pub name: String,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    pub calendar: Option<String>,
    pub value_expression: Option<String>,
    pub result_expression: Option<String>,
    pub collectors: Vec<String>,
    pub collector_groups: Vec<String>,
    pub value_actions: Vec<String>,
    pub result_actions: Vec<String>,
    pub clusters: Vec<String>,
    pub attributes: Attributes,
}

impl Derivable for WageType {
    type Key = WageTypeNumber;
    const KIND: EntityKind = EntityKind::WageType;

    fn key(&self) -> WageTypeNumber {
        self.wage_type_number
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn clusters(&self) -> Option<&[String]> {
        Some(&self.clusters)
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::WageType,
            field_rules!(WageType {
                scalar name,
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar calendar,
                scalar value_expression,
                scalar result_expression,
                list collectors,
                list collector_groups,
                list value_actions,
                list result_actions,
                list clusters,
                map attributes,
            }),
            &["id", "wage_type_number", "value_type", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.wage_types
    }
}
