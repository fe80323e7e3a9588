//! # Resolver Configuration
//!
//! Two behaviors of the derivation engine are configurable.
//!
//! | Setting | Default | Alternative |
//! |---------|---------|-------------|
//! | `filter_anchor` | `most_specific` | `supplied_first` |
//! | `map_precedence` | `least_specific_wins` | `most_specific_wins` |
//!
//! Configuration files are YAML (or JSON, which YAML accepts). Every field is
//! optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use payroll_core::{PayrollError, PayrollResult};

/// Which candidate of a group the override filter inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAnchor {
    /// Sort the group into derivation order first and inspect its most
    /// specific candidate. Independent of the supplier's row order.
    #[default]
    MostSpecific,
    /// Inspect the first candidate exactly as the supplier delivered it.
    /// Correct only when the supplier pre-sorts rows by layer rank.
    SuppliedFirst,
}

/// Which layer wins a key collision when map-valued fields are overlaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapPrecedence {
    /// Maps are overlaid in derivation order, most specific first, so the
    /// least specific layer's entry survives a collision. This is the
    /// established behavior and is kept for compatibility.
    #[default]
    LeastSpecificWins,
    /// Maps are overlaid least specific first, so the most specific layer's
    /// entry survives, matching scalar override precedence.
    MostSpecificWins,
}

/// Derivation engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Override filter anchor.
    pub filter_anchor: FilterAnchor,
    /// Map overlay collision precedence.
    pub map_precedence: MapPrecedence,
}

impl ResolverConfig {
    /// Parse a configuration from YAML (or JSON) text.
    pub fn from_yaml_str(text: &str) -> PayrollResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| PayrollError::Serialization(e.to_string()))
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Io`] if the file cannot be read and
    /// [`PayrollError::Serialization`] if it does not parse.
    pub fn from_path(path: &Path) -> PayrollResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text).map_err(|e| match e {
            PayrollError::Serialization(detail) => {
                PayrollError::Serialization(format!("{}: {detail}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded resolver configuration");
        Ok(config)
    }
}
