//! # Canonicalize Subcommand
//!
//! Prints the canonical JSON form of one record: keys sorted at every level
//! except inside `objects`, timestamps normalized to whole seconds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stix_model::{registry, serialize, serialize_compact, Parser, ValidationConfig};

use crate::{read_input, EXIT_INVALID};

/// Arguments for the canonicalize subcommand.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// Record file (`-` for standard input).
    pub path: PathBuf,

    /// Emit without whitespace.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the canonicalize subcommand.
pub fn run_canonicalize(args: &CanonicalizeArgs, config: &ValidationConfig) -> Result<u8> {
    let text = read_input(&args.path)?;
    let parser = Parser::new(registry::global()).with_config(*config);
    match canonical_text(&parser, &text, args.compact) {
        Ok(canonical) => {
            println!("{canonical}");
            Ok(0)
        }
        Err(report) => {
            eprintln!("{}: {report}", args.path.display());
            Ok(EXIT_INVALID)
        }
    }
}

/// Canonical form of `text`, or the rendered parse error.
fn canonical_text(parser: &Parser<'_>, text: &str, compact: bool) -> Result<String, String> {
    let object = parser.parse(text).map_err(|e| e.to_string())?;
    Ok(if compact {
        serialize_compact(&object)
    } else {
        serialize(&object)
    })
}
