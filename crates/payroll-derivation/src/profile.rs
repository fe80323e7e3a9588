//! # Entity Profiles
//!
//! An [`EntityProfile`] is the per-kind declaration the derivation engine is
//! parameterized by: an ordered table of mergeable fields, each tagged with
//! its [`MergeStrategy`], plus the list of fields that are never derived and
//! always come from the candidate the caller selects.
//!
//! Profiles are written as data with the `field_rules!` macro:
//!
//! ```text
//! field_rules!(Lookup {
//!     scalar name_localizations,
//!     scalar description,
//!     map attributes,
//! })
//! ```

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use payroll_core::{EntityKind, OverrideType, PayrollError, PayrollResult};

use crate::config::MapPrecedence;
use crate::entities::RegulationObjects;
use crate::merge::MergeStrategy;

/// Computes one field of `target` from the remaining chain.
pub type ApplyFn<T> = fn(&mut T, &[&T], MapPrecedence);

/// A single row of a profile table.
pub struct FieldRule<T> {
    field: &'static str,
    strategy: MergeStrategy,
    apply: ApplyFn<T>,
}

impl<T> FieldRule<T> {
    /// Create a field rule. Normally generated by `field_rules!`.
    pub fn new(field: &'static str, strategy: MergeStrategy, apply: ApplyFn<T>) -> Self {
        Self {
            field,
            strategy,
            apply,
        }
    }

    /// Field name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Merge strategy for the field.
    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }
}

impl<T> Debug for FieldRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Build one [`FieldRule`] for a named struct field.
macro_rules! field_rule {
    ($ty:ty, scalar, $field:ident) => {
        $crate::profile::FieldRule::new(
            stringify!($field),
            $crate::merge::MergeStrategy::ScalarOverride,
            |target: &mut $ty, chain: &[&$ty], _: $crate::config::MapPrecedence| {
                target.$field = $crate::merge::scalar_override(chain.iter().map(|c| &c.$field));
            },
        )
    };
    ($ty:ty, list, $field:ident) => {
        $crate::profile::FieldRule::new(
            stringify!($field),
            $crate::merge::MergeStrategy::ListUnion,
            |target: &mut $ty, chain: &[&$ty], _: $crate::config::MapPrecedence| {
                target.$field = $crate::merge::list_union(chain.iter().map(|c| c.$field.as_slice()));
            },
        )
    };
    ($ty:ty, map, $field:ident) => {
        $crate::profile::FieldRule::new(
            stringify!($field),
            $crate::merge::MergeStrategy::MapOverlay,
            |target: &mut $ty, chain: &[&$ty], precedence: $crate::config::MapPrecedence| {
                target.$field =
                    $crate::merge::map_overlay(chain.iter().map(|c| &c.$field), precedence);
            },
        )
    };
}

/// Build a profile table: `field_rules!(Type { scalar a, list b, map c })`.
macro_rules! field_rules {
    ($ty:ty { $($strategy:ident $field:ident),* $(,)? }) => {
        vec![$($crate::profile::field_rule!($ty, $strategy, $field)),*]
    };
}

pub(crate) use field_rule;
pub(crate) use field_rules;

/// Field-to-strategy table for one entity kind.
pub struct EntityProfile<T> {
    kind: EntityKind,
    rules: Vec<FieldRule<T>>,
    verbatim: &'static [&'static str],
}

impl<T> EntityProfile<T> {
    /// Create a profile from a rule table and the list of verbatim fields.
    pub fn new(
        kind: EntityKind,
        rules: Vec<FieldRule<T>>,
        verbatim: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            rules,
            verbatim,
        }
    }

    /// The entity kind this profile describes.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Mergeable fields in declaration order.
    pub fn rules(&self) -> &[FieldRule<T>] {
        &self.rules
    }

    /// Fields that are never derived.
    pub fn verbatim_fields(&self) -> &'static [&'static str] {
        self.verbatim
    }

    /// The merge strategy of a field, or `None` if the field is not derived.
    pub fn strategy_of(&self, field: &str) -> Option<MergeStrategy> {
        self.rules
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| rule.strategy)
    }

    /// Names of all fields merged with `strategy`.
    pub fn fields_with(&self, strategy: MergeStrategy) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.strategy == strategy)
            .map(|rule| rule.field)
            .collect()
    }

    /// Compute every declared field of `target` over `chain`.
    ///
    /// `chain` is the remaining group in derivation order and normally
    /// starts with `target`'s own unmodified value.
    pub fn apply(&self, target: &mut T, chain: &[&T], precedence: MapPrecedence) {
        for rule in &self.rules {
            (rule.apply)(target, chain, precedence);
        }
    }

    /// A serializable summary of this profile.
    pub fn describe(&self) -> ProfileDescription {
        ProfileDescription {
            kind: self.kind,
            fields: self
                .rules
                .iter()
                .map(|rule| FieldDescription {
                    field: rule.field,
                    strategy: rule.strategy,
                })
                .collect(),
            verbatim: self.verbatim.to_vec(),
        }
    }
}

impl<T> Debug for EntityProfile<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityProfile")
            .field("kind", &self.kind)
            .field("rules", &self.rules)
            .field("verbatim", &self.verbatim)
            .finish()
    }
}

/// Serializable view of an [`EntityProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDescription {
    /// Entity kind.
    pub kind: EntityKind,
    /// Mergeable fields with their strategies.
    pub fields: Vec<FieldDescription>,
    /// Fields copied from the selected candidate only.
    pub verbatim: Vec<&'static str>,
}

/// One field of a [`ProfileDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescription {
    /// Field name.
    pub field: &'static str,
    /// Merge strategy.
    pub strategy: MergeStrategy,
}

/// Natural key of a regulation object.
pub trait ObjectKey: Clone + Ord + Eq + Hash + Debug + Display + Serialize {
    /// Reject keys that cannot identify an object.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidArgument`] for blank names, blank
    /// composite parts or non-positive numbers.
    fn validate(&self) -> PayrollResult<()>;

    /// The text a key narrowing filter is compared with.
    fn filter_name(&self) -> String {
        self.to_string()
    }
}

impl ObjectKey for String {
    fn validate(&self) -> PayrollResult<()> {
        if self.trim().is_empty() {
            return Err(PayrollError::invalid("object name must not be blank"));
        }
        Ok(())
    }
}

/// A regulation object kind that takes part in derivation.
pub trait Derivable: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The natural key candidates are grouped by.
    type Key: ObjectKey;

    /// The entity kind.
    const KIND: EntityKind;

    /// Extract the natural key.
    fn key(&self) -> Self::Key;

    /// Override policy declared by this layer's author.
    fn override_type(&self) -> OverrideType;

    /// Cluster tags used by cluster include/exclude filtering. `None` for
    /// kinds that carry no clusters; such objects are never cluster-filtered.
    fn clusters(&self) -> Option<&[String]> {
        None
    }

    /// The field-to-strategy table of this kind.
    fn profile() -> EntityProfile<Self>;

    /// This kind's objects within a regulation.
    fn select(objects: &RegulationObjects) -> &[Self];
}
