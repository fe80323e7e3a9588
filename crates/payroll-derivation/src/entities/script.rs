//! Script: shared source code referenced by expressions.

use serde::{Deserialize, Serialize};

use payroll_core::values::FunctionType;
use payroll_core::{EntityKind, ObjectId, OverrideType};

use crate::entities::RegulationObjects;
use crate::profile::{field_rules, Derivable, EntityProfile};

/// A regulation script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub id: Option<ObjectId>,
    pub name: String,
    pub override_type: OverrideType,
    pub function_types: Vec<FunctionType>,
    /// Script source.
    pub value: Option<String>,
}

impl Derivable for Script {
    type Key = String;
    const KIND: EntityKind = EntityKind::Script;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn override_type(&self) -> OverrideType {
        self.override_type
    }

    fn profile() -> EntityProfile<Self> {
        EntityProfile::new(
            EntityKind::Script,
            field_rules!(Script {
                list function_types,
                scalar value,
            }),
            &["id", "name", "override_type"],
        )
    }

    fn select(objects: &RegulationObjects) -> &[Self] {
        &objects.scripts
    }
}
