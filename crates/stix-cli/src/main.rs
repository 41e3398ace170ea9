//! # stix CLI entry point
//!
//! Parses command-line arguments, loads the optional configuration, installs
//! the type registry and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stix_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use stix_cli::config::CliConfig;
use stix_cli::id::{run_id, IdArgs};
use stix_cli::types::{run_types, TypesArgs};
use stix_cli::validate::{run_validate, ValidateArgs};
use stix_cli::EXIT_OPERATIONAL;

/// STIX record toolchain.
///
/// Validates records against their type schemas, prints canonical JSON and
/// derives deterministic identifiers for observables.
#[derive(Parser, Debug)]
#[command(name = "stix", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate record files and report every defect.
    Validate(ValidateArgs),

    /// Print the canonical JSON form of a record.
    Canonicalize(CanonicalizeArgs),

    /// List registered object types.
    Types(TypesArgs),

    /// Print the deterministic identifier of an observable record.
    Id(IdArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "stix CLI starting");

    let result = load_config(cli.config.as_ref()).and_then(|config| {
        let validation = config.validation;
        match cli.command {
            Commands::Validate(args) => run_validate(&args, &validation),
            Commands::Canonicalize(args) => run_canonicalize(&args, &validation),
            Commands::Types(args) => run_types(&args),
            Commands::Id(args) => run_id(&args, &validation),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

/// Load the configuration file, if given, and install its registry.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CliConfig> {
    let config = match path {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    config.install()?;
    Ok(config)
}
