//! # stix-cli — Command-Line Interface for STIX Records
//!
//! Provides the `stix` binary. Handlers read files, hand the text to
//! `stix-model` and print the result; all validation and serialization
//! logic lives in the library crates.
//!
//! ## Subcommands
//!
//! - `stix validate`: Parse records and report every defect.
//! - `stix canonicalize`: Print the canonical JSON form of a record.
//! - `stix types`: List registered object types.
//! - `stix id`: Print the deterministic identifier of an observable.
//!
//! ```bash
//! stix validate records/*.json
//! stix --config stix.yaml canonicalize record.json --compact
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: success.
//! - `1`: at least one record is invalid.
//! - `2`: operational error (unreadable file, bad configuration).

pub mod canonicalize;
pub mod config;
pub mod id;
pub mod types;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Exit code for invalid records.
pub const EXIT_INVALID: u8 = 1;

/// Exit code for operational errors.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Read a record file. `-` reads standard input.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
