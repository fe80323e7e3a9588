//! # Identity Newtypes
//!
//! Positive-integer identifiers for tenants, payrolls, regulations, and
//! regulation objects. Each identifier is a distinct type: a `RegulationId`
//! cannot be passed where a `PayrollId` is expected.
//!
//! ## Validation
//!
//! Identifiers are assigned by the persistence layer and are strictly
//! positive. Construction (including deserialization) rejects zero and
//! negative values with [`PayrollError::InvalidArgument`].

use serde::{Deserialize, Serialize};

use crate::error::PayrollError;

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier, rejecting non-positive values.
            pub fn new(value: i64) -> Result<Self, PayrollError> {
                if value <= 0 {
                    return Err(PayrollError::InvalidArgument(format!(
                        "{} must be positive, got {value}",
                        $label
                    )));
                }
                Ok(Self(value))
            }

            /// Access the raw identifier value.
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = PayrollError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(
    /// Identifier of a tenant owning payrolls and regulations.
    TenantId,
    "tenant id"
);

positive_id!(
    /// Identifier of a payroll referencing a stack of regulation layers.
    PayrollId,
    "payroll id"
);

positive_id!(
    /// Identifier of a regulation.
    RegulationId,
    "regulation id"
);

positive_id!(
    /// Identifier of a single regulation object (case, wage type, ...).
    ObjectId,
    "object id"
);
