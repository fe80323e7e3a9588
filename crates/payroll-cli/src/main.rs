//! # payroll CLI entry point
//!
//! Parses command-line arguments, initializes tracing, loads the resolver
//! configuration and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use payroll_cli::load_config;
use payroll_cli::profile::{run_profile, ProfileArgs};
use payroll_cli::resolve::{run_resolve, ResolveArgs};
use payroll_cli::validate::{run_validate, ValidateArgs};

/// Payroll regulation derivation.
///
/// Derives the effective cases, wage types, collectors, lookups, reports
/// and scripts of a payroll from its stacked regulation layers.
#[derive(Parser, Debug)]
#[command(name = "payroll", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the resolver configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the effective objects of one entity kind.
    Resolve(ResolveArgs),

    /// Print merge strategies per entity field.
    Profile(ProfileArgs),

    /// Check a bundle's layer stack, regulation references and object keys.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the verbosity flag.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("payroll CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Resolve(args) => run_resolve(args, &config),
        Commands::Profile(args) => run_profile(args),
        Commands::Validate(args) => run_validate(args),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
