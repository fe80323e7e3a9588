//! # Field Merger
//!
//! The three merge strategies, and the fold that applies an entity profile
//! across a group in derivation order.
//!
//! ## Strategies
//!
//! | Strategy | Result for field `f` over the remaining chain (most specific first) |
//! |----------|-----------------------------------------------------------------------|
//! | Scalar override | first value of `f` that is not [unset](Unset) |
//! | List union | concatenation of every `f`, in chain order, duplicates kept |
//! | Map overlay | entries of every `f` inserted into one map; see [`MapPrecedence`] |
//!
//! ## Fold
//!
//! For a group ordered `[c0, c1, ..., cn]`, candidate `ci` receives the
//! fields computed over the chain `[ci, ..., cn]`. The last candidate is left
//! as supplied. `c0` therefore holds the fully effective object while every
//! other candidate holds the partial fold of its own layer and the layers
//! below it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use payroll_core::values::{CaseCancellationType, ValueScope};

use crate::candidate::Candidate;
use crate::config::MapPrecedence;
use crate::profile::EntityProfile;

/// How a field's value is computed across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// The most specific layer that sets the field wins.
    ScalarOverride,
    /// Layers add to the list; nothing is replaced or de-duplicated.
    ListUnion,
    /// Layers contribute entries to one map.
    MapOverlay,
}

impl MergeStrategy {
    /// Returns the snake_case identifier for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScalarOverride => "scalar_override",
            Self::ListUnion => "list_union",
            Self::MapOverlay => "map_overlay",
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The "default" test used by scalar override.
///
/// A layer that leaves a field unset does not override the layers below it.
/// Null, empty text and zero are all unset, also when wrapped in `Some`.
pub trait Unset {
    /// Whether this value counts as not set by its layer.
    fn is_unset(&self) -> bool;
}

impl<T: Unset> Unset for Option<T> {
    fn is_unset(&self) -> bool {
        self.as_ref().map_or(true, Unset::is_unset)
    }
}

impl Unset for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Unset for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Unset for BTreeMap<K, V> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl Unset for i32 {
    fn is_unset(&self) -> bool {
        *self == 0
    }
}

impl Unset for i64 {
    fn is_unset(&self) -> bool {
        *self == 0
    }
}

impl Unset for Decimal {
    fn is_unset(&self) -> bool {
        self.is_zero()
    }
}

// A chosen enum variant is always a value; only `None` leaves it unset.
impl Unset for CaseCancellationType {
    fn is_unset(&self) -> bool {
        false
    }
}

impl Unset for ValueScope {
    fn is_unset(&self) -> bool {
        false
    }
}

/// First set value in chain order, or the type's default when no layer
/// sets it.
pub fn scalar_override<'a, V>(values: impl IntoIterator<Item = &'a V>) -> V
where
    V: Unset + Clone + Default + 'a,
{
    values
        .into_iter()
        .find(|value| !value.is_unset())
        .cloned()
        .unwrap_or_default()
}

/// Concatenation of every list in chain order. Duplicates are retained.
pub fn list_union<'a, V>(lists: impl IntoIterator<Item = &'a [V]>) -> Vec<V>
where
    V: Clone + 'a,
{
    lists.into_iter().flat_map(|list| list.iter().cloned()).collect()
}

/// Overlay of every map in the chain.
///
/// With [`MapPrecedence::LeastSpecificWins`] maps are inserted in chain
/// order (most specific first), so a later, less specific entry replaces an
/// earlier one on key collision. [`MapPrecedence::MostSpecificWins`] inserts
/// in reverse chain order.
pub fn map_overlay<'a, K, V>(
    maps: impl IntoIterator<Item = &'a BTreeMap<K, V>>,
    precedence: MapPrecedence,
) -> BTreeMap<K, V>
where
    K: Ord + Clone + 'a,
    V: Clone + 'a,
{
    let mut maps: Vec<&BTreeMap<K, V>> = maps.into_iter().collect();
    if precedence == MapPrecedence::MostSpecificWins {
        maps.reverse();
    }
    let mut merged = BTreeMap::new();
    for map in maps {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Fold a group that is already in derivation order.
///
/// Returns new candidates; the input is not modified. The result has the
/// same length and order as the input, and its head is the effective object.
pub fn derive_group<T: Clone>(
    ordered: &[Candidate<T>],
    profile: &EntityProfile<T>,
    precedence: MapPrecedence,
) -> Vec<Candidate<T>> {
    let objects: Vec<&T> = ordered.iter().map(|candidate| &candidate.object).collect();
    ordered
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let mut folded = candidate.clone();
            if index + 1 < ordered.len() {
                profile.apply(&mut folded.object, &objects[index..], precedence);
            }
            folded
        })
        .collect()
}
