//! # Types Subcommand
//!
//! Lists every type in the process-wide registry with its class and the
//! properties it declares beyond the common ones.

use anyhow::Result;
use clap::Args;

use stix_model::{registry, TypeRegistry};

/// Arguments for the types subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Also list each type's properties.
    #[arg(long)]
    pub properties: bool,
}

/// Execute the types subcommand.
pub fn run_types(args: &TypesArgs) -> Result<u8> {
    print!("{}", render(registry::global(), args.properties));
    Ok(0)
}

fn render(registry: &TypeRegistry, with_properties: bool) -> String {
    let mut out = String::new();
    for entry in registry.entries() {
        let schema = entry.schema();
        out.push_str(&format!("{:<24} {}\n", schema.type_name(), schema.class()));
        if !with_properties {
            continue;
        }
        let common = schema.class().common_properties();
        for def in schema.properties().iter().filter(|d| !common.contains(&d.name())) {
            let required = if def.is_required() { " (required)" } else { "" };
            out.push_str(&format!("    {:<22} {:?}{required}\n", def.name(), def.kind()));
        }
    }
    out.push_str(&format!("\nTotal: {} types\n", registry.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_builtins_sorted() {
        let out = render(&TypeRegistry::with_builtins(), false);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("artifact"));
        assert!(lines[0].ends_with("observable"));
        assert!(lines[5].starts_with("observed-data"));
        assert!(lines[5].ends_with("domain"));
        assert!(out.ends_with("Total: 6 types\n"));
    }

    #[test]
    fn properties_mark_required() {
        let out = render(&TypeRegistry::with_builtins(), true);
        assert!(out.contains("number_observed"));
        assert!(out
            .lines()
            .any(|l| l.trim_start().starts_with("value") && l.ends_with("(required)")));
        assert!(!out.lines().any(|l| l.trim_start().starts_with("created ")));
    }
}
