//! # Profile Subcommand
//!
//! Prints the field/strategy table of one or all entity kinds.

use anyhow::Result;
use clap::Args;

use payroll_core::EntityKind;
use payroll_derivation::{describe_profile, ProfileDescription};

use crate::{render, OutputFormat};

/// Arguments for the profile subcommand.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Entity kind to describe. All kinds when omitted.
    #[arg(long)]
    pub kind: Option<EntityKind>,

    /// Machine-readable output instead of a text table.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the profile subcommand.
pub fn run_profile(args: &ProfileArgs) -> Result<u8> {
    let descriptions = collect(args.kind);
    let output = match args.format {
        Some(format) => render(&descriptions, format)?,
        None => format_table(&descriptions),
    };
    println!("{output}");
    Ok(0)
}

fn collect(kind: Option<EntityKind>) -> Vec<ProfileDescription> {
    match kind {
        Some(kind) => vec![describe_profile(kind)],
        None => EntityKind::all().iter().copied().map(describe_profile).collect(),
    }
}

/// Render profile descriptions as an aligned text table.
pub fn format_table(descriptions: &[ProfileDescription]) -> String {
    let mut out = String::new();
    for description in descriptions {
        out.push_str(&format!("{}\n", description.kind));
        for field in &description.fields {
            out.push_str(&format!("  {:<28} {}\n", field.field, field.strategy));
        }
        out.push_str(&format!("  {:<28} {}\n", "(verbatim)", description.verbatim.join(", ")));
    }
    out
}
