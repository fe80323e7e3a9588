//! # payroll-cli: Regulation Derivation Command-Line Interface
//!
//! Provides the `payroll` binary on top of `payroll-derivation`.
//!
//! ## Subcommands
//!
//! - `payroll resolve`: Derive the effective objects of one entity kind
//!   from a regulation bundle.
//! - `payroll profile`: Print the field/strategy table of entity kinds.
//! - `payroll validate`: Check a bundle's payroll layer stack, regulation
//!   references and object keys.
//!
//! ```bash
//! payroll resolve --bundle payroll.yaml --kind collector --override-type active
//! payroll resolve --bundle payroll.yaml --kind case --key Salary --all-layers --format yaml
//! payroll profile --kind wage-type
//! payroll validate --bundle payroll.yaml
//! ```
//!
//! Handlers return an exit code: `0` on success, `2` when the input is
//! well-formed but fails validation. Operational failures surface as errors
//! and exit with `1`.

pub mod profile;
pub mod resolve;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use payroll_derivation::ResolverConfig;

/// Exit code for input that parses but fails validation.
pub const EXIT_INVALID: u8 = 2;

/// Machine-readable output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Serialize a value in the requested format.
pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(text)
}

/// Load the resolver configuration, falling back to defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::from_path(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

/// Call a generic function with the entity type matching an
/// [`EntityKind`](payroll_core::EntityKind).
macro_rules! dispatch_kind {
    ($kind:expr, $func:ident ( $($arg:expr),* $(,)? )) => {{
        use payroll_core::EntityKind as K;
        use payroll_derivation::entities as e;
        match $kind {
            K::Case => $func::<e::Case>($($arg),*),
            K::CaseField => $func::<e::CaseField>($($arg),*),
            K::CaseRelation => $func::<e::CaseRelation>($($arg),*),
            K::Collector => $func::<e::Collector>($($arg),*),
            K::WageType => $func::<e::WageType>($($arg),*),
            K::Lookup => $func::<e::Lookup>($($arg),*),
            K::LookupValue => $func::<e::LookupValue>($($arg),*),
            K::Report => $func::<e::Report>($($arg),*),
            K::ReportParameter => $func::<e::ReportParameter>($($arg),*),
            K::ReportTemplate => $func::<e::ReportTemplate>($($arg),*),
            K::Script => $func::<e::Script>($($arg),*),
        }
    }};
}

pub(crate) use dispatch_kind;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;

    pub const BUNDLE: &str = r#"
payroll:
  id: 7
  tenant_id: 3
  name: Monthly
  layers:
    - { level: 0, regulation_id: 10 }
    - { level: 1, regulation_id: 20 }
regulations:
  - regulation: { id: 10, tenant_id: 3, name: CH.Base }
    objects:
      collectors:
        - { name: Vacation, clusters: [base], attributes: { x: 1, y: 3 } }
        - { name: Gross, clusters: [base] }
      wage_types:
        - { wage_type_number: 1000, name: Salary }
  - regulation: { id: 20, tenant_id: 3, name: Company }
    objects:
      collectors:
        - { name: Vacation, threshold: 5, clusters: [region], attributes: { x: 2 } }
        - { name: Gross, override_type: inactive }
"#;

    /// Write the bundle into a temporary directory.
    pub fn bundle_file(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("bundle.yaml");
        std::fs::write(&path, text).unwrap();
        path
    }
}
