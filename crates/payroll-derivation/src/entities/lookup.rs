//! Lookups and lookup values.
//!
//! A lookup value is keyed by its lookup and its own key, so rows of two
//! different lookups that happen to share a key are never merged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use payroll_core::{Attributes, EntityKind, Localizations, ObjectId, OverrideType, PayrollError, PayrollResult};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile, ObjectKey};

/// A keyed lookup table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lookup {
    pub id: Option<ObjectId>,
    pub name: String,
    pub override_type: OverrideType,
    pub name_localizations: Localizations,
    pub description: Option<String>,
    pub description_localizations: Localizations,
    /// Bucket width for range lookups.
    pub range_size: Option<Decimal>,
    pub attributes: Attributes,
}

impl Derivable for Lookup {
    type Key = String;
    const KIND: EntityKind = EntityKind::Lookup;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::Lookup,
            field_rules!(Lookup {
                scalar name_localizations,
                scalar description,
                scalar description_localizations,
                scalar range_size,
                map attributes,
            }),
            &["id", "name", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.lookups
    }
}

/// A single row of a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupValue {
    pub id: Option<ObjectId>,
    /// Name of the lookup owning this row.
    pub lookup_name: String,
    pub key: String,
    pub override_type: OverrideType,
    /// JSON-encoded row value.
    pub value: Option<String>,
    pub value_localizations: Localizations,
    pub range_value: Option<Decimal>,
}

/// Composite key of a lookup value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LookupValueKey {
    pub lookup_name: String,
    pub key: String,
}

impl std::fmt::Display for LookupValueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.lookup_name, self.key)
    }
}

impl ObjectKey for LookupValueKey {
    fn validate(&self) -> PayrollResult<()> {
        if self.lookup_name.trim().is_empty() {
            return Err(PayrollError::invalid(format!(
                "lookup value {self} has a blank lookup name"
            )));
        }
        if self.key.trim().is_empty() {
            return Err(PayrollError::invalid(format!(
                "lookup value {self} has a blank key"
            )));
        }
        Ok(())
    }

    /// Narrowing filters name the row key.
    fn filter_name(&self) -> String {
        self.key.clone()
    }
}

impl Derivable for LookupValue {
    type Key = LookupValueKey;
    const KIND: EntityKind = EntityKind::LookupValue;

    fn key(&self) -> LookupValueKey {
        LookupValueKey {
            lookup_name: self.lookup_name.clone(),
            key: self.key.clone(),
        }
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::LookupValue,
            field_rules!(LookupValue {
                scalar value,
                scalar value_localizations,
                scalar range_value,
            }),
            &["id", "lookup_name", "key", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.lookup_values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(lookup: &str, key: &str) -> LookupValue {
        LookupValue {
            lookup_name: lookup.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    #[test]
    fn same_key_in_different_lookups_differs() {
        assert_ne!(value("Canton", "ZH").key(), value("Church", "ZH").key());
        assert_eq!(value("Canton", "ZH").key().to_string(), "Canton[ZH]");
    }

    #[test]
    fn filter_name_is_row_key() {
        assert_eq!(value("Canton", "ZH").key().filter_name(), "ZH");
    }

    #[test]
    fn blank_parts_rejected() {
        assert!(value("", "ZH").key().validate().is_err());
        assert!(value("Canton", " ").key().validate().is_err());
        assert!(value("Canton", "ZH").key().validate().is_ok());
    }
}
