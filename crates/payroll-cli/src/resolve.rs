//! # Resolve Subcommand
//!
//! Loads a regulation bundle, supplies candidates for one entity kind and
//! prints the derived objects.
//!
//! By default only the effective object of each group is printed. With
//! `--all-layers` every group is printed with all of its folded layers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use payroll_core::{EntityKind, OverrideType, PayrollId, TenantId};
use payroll_derivation::{
    ClusterSet, Derivable, DerivationQuery, DerivationResolver, RegulationStore, ResolverConfig,
};

use crate::{dispatch_kind, render, OutputFormat};

/// Arguments for the resolve subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Regulation bundle (YAML, or JSON with a `.json` extension).
    #[arg(long)]
    pub bundle: PathBuf,

    /// Entity kind to resolve (e.g. case, wage-type, lookup-value).
    #[arg(long)]
    pub kind: EntityKind,

    /// Tenant of the payroll. Defaults to the bundle's payroll tenant.
    #[arg(long)]
    pub tenant: Option<i64>,

    /// Payroll to resolve. Defaults to the bundle's payroll.
    #[arg(long)]
    pub payroll: Option<i64>,

    /// Keep only objects with this override type.
    #[arg(long)]
    pub override_type: Option<OverrideType>,

    /// Narrow to these names, numbers or keys.
    #[arg(long = "key")]
    pub keys: Vec<String>,

    /// Keep only objects carrying one of these clusters.
    #[arg(long = "include-cluster")]
    pub include_clusters: Vec<String>,

    /// Drop objects carrying any of these clusters.
    #[arg(long = "exclude-cluster")]
    pub exclude_clusters: Vec<String>,

    /// Evaluation moment (RFC 3339). Regulations not yet valid are skipped.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Print every folded layer instead of the effective objects only.
    #[arg(long)]
    pub all_layers: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs, config: &ResolverConfig) -> Result<u8> {
    let output = resolve_bundle(args, config)?;
    println!("{output}");
    Ok(0)
}

/// Resolve the bundle and render the result.
pub fn resolve_bundle(args: &ResolveArgs, config: &ResolverConfig) -> Result<String> {
    let store = RegulationStore::from_path(&args.bundle)
        .with_context(|| format!("failed to load bundle {}", args.bundle.display()))?;
    let query = build_query(args, &store)?;
    let resolver = DerivationResolver::new(*config);
    dispatch_kind!(args.kind, resolve_kind(&resolver, &store, &query, args))
}

fn build_query(args: &ResolveArgs, store: &RegulationStore) -> Result<DerivationQuery> {
    let payroll = store.payroll();
    let tenant_id = match args.tenant {
        Some(raw) => TenantId::new(raw).context("--tenant")?,
        None => payroll.tenant_id,
    };
    let payroll_id = match args.payroll {
        Some(raw) => PayrollId::new(raw).context("--payroll")?,
        None => payroll.id,
    };

    let mut query = DerivationQuery::new(tenant_id, payroll_id)
        .with_keys(args.keys.iter().cloned())
        .with_clusters(ClusterSet {
            include: args.include_clusters.clone(),
            exclude: args.exclude_clusters.clone(),
        });
    if let Some(moment) = args.at {
        query = query.at(moment);
    }
    if let Some(override_type) = args.override_type {
        query = query.with_override_type(override_type);
    }
    Ok(query)
}

fn resolve_kind<T: Derivable>(
    resolver: &DerivationResolver,
    store: &RegulationStore,
    query: &DerivationQuery,
    args: &ResolveArgs,
) -> Result<String> {
    let resolution = resolver
        .resolve_from::<T, _>(store, query)
        .with_context(|| format!("failed to resolve {}", T::KIND))?;
    tracing::info!(
        kind = %T::KIND,
        groups = resolution.len(),
        filtered_groups = resolution.stats.filtered_groups,
        "resolution complete"
    );

    if args.all_layers {
        render(&resolution.groups, args.format)
    } else {
        render(&resolution.effective(), args.format)
    }
}
