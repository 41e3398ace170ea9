//! # Id Subcommand
//!
//! Prints the deterministic identifier of an observable record: UUIDv5 over
//! the canonical form of its ID-contributing properties.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stix_core::StixId;
use stix_model::{registry, Parser, StixObject, TypeRegistry, ValidationConfig};

use crate::{read_input, EXIT_INVALID};

/// Arguments for the id subcommand.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Record file (`-` for standard input).
    pub path: PathBuf,
}

/// Execute the id subcommand.
pub fn run_id(args: &IdArgs, config: &ValidationConfig) -> Result<u8> {
    let text = read_input(&args.path)?;
    let registry = registry::global();
    let object = match Parser::new(registry).with_config(*config).parse(&text) {
        Ok(object) => object,
        Err(e) => {
            eprintln!("{}: {e}", args.path.display());
            return Ok(EXIT_INVALID);
        }
    };

    match derive(registry, &object) {
        Some(id) => {
            println!("{id}");
            Ok(0)
        }
        None => {
            eprintln!(
                "{}: no deterministic id for a {} object of type \"{}\"",
                args.path.display(),
                object.class(),
                object.type_name()
            );
            Ok(EXIT_INVALID)
        }
    }
}

fn derive(registry: &TypeRegistry, object: &StixObject) -> Option<StixId> {
    let id = registry.deterministic_id(object)?;
    if let Some(given) = object.id().filter(|given| **given != id) {
        tracing::warn!(given = %given, derived = %id, "record id differs from its deterministic id");
    }
    Some(id)
}
