//! # Validate Subcommand
//!
//! Parses each record file against the process-wide registry and reports
//! either the parsed type and id, or every defect found.
//!
//! ```bash
//! stix validate indicator.json observed.json
//! stix validate --json records/*.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde_json::json;

use stix_model::{registry, ParseError, Parser, StixObject, ValidationConfig};

use crate::{read_input, EXIT_INVALID, EXIT_OPERATIONAL};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Record files to validate (`-` for standard input).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Emit one JSON report per file instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Outcome for one file.
#[derive(Debug)]
enum Outcome {
    Valid(StixObject),
    Invalid(ParseError),
    Unreadable(anyhow::Error),
}

impl Outcome {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Valid(_) => 0,
            Self::Invalid(_) => EXIT_INVALID,
            Self::Unreadable(_) => EXIT_OPERATIONAL,
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns the highest exit code over all files: 0 when every record is
/// valid, 1 when any is invalid, 2 when any could not be read.
pub fn run_validate(args: &ValidateArgs, config: &ValidationConfig) -> Result<u8> {
    let parser = Parser::new(registry::global()).with_config(*config);
    let mut code = 0;

    for path in &args.paths {
        let outcome = check_file(&parser, path);
        code = code.max(outcome.exit_code());
        if args.json {
            println!("{}", json_report(path, &outcome));
        } else {
            print!("{}", text_report(path, &outcome));
        }
    }

    tracing::info!(files = args.paths.len(), exit_code = code, "validation finished");
    Ok(code)
}

fn check_file(parser: &Parser<'_>, path: &Path) -> Outcome {
    let text = match read_input(path) {
        Ok(text) => text,
        Err(e) => return Outcome::Unreadable(e),
    };
    match parser.parse(&text) {
        Ok(object) => Outcome::Valid(object),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "record rejected");
            Outcome::Invalid(e)
        }
    }
}

fn text_report(path: &Path, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Valid(object) => format!(
            "{}: OK {} {}\n",
            path.display(),
            object.type_name(),
            object.id().map_or_else(|| "-".to_string(), ToString::to_string)
        ),
        Outcome::Invalid(ParseError::Invalid(error)) => {
            let mut report = format!("{}: FAIL ({} defects)\n", path.display(), error.len());
            for defect in error.defects() {
                report.push_str(&format!("  - {defect}\n"));
            }
            report
        }
        Outcome::Invalid(e) => format!("{}: FAIL\n  - {e}\n", path.display()),
        Outcome::Unreadable(e) => format!("{}: ERROR {e:#}\n", path.display()),
    }
}

fn json_report(path: &Path, outcome: &Outcome) -> serde_json::Value {
    let path = path.display().to_string();
    match outcome {
        Outcome::Valid(object) => json!({
            "path": path,
            "valid": true,
            "type": object.type_name(),
            "id": object.id().map(ToString::to_string),
        }),
        Outcome::Invalid(e) => {
            let defects: Vec<String> = match e.validation() {
                Some(error) => error.defects().iter().map(ToString::to_string).collect(),
                None => vec![e.to_string()],
            };
            json!({
                "path": path,
                "valid": false,
                "type": e.validation().and_then(|v| v.type_name()),
                "defects": defects,
            })
        }
        Outcome::Unreadable(e) => json!({
            "path": path,
            "valid": false,
            "error": format!("{e:#}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"type": "domain-name", "value": "example.com"}"#;

    const INVALID: &str = r#"{
        "type": "observed-data",
        "id": "observed-data--b67d30ff-02ac-498a-92f9-32f845f448cf",
        "created": "2016-04-06T19:58:16Z",
        "modified": "2016-04-06T19:58:16Z",
        "first_observed": "2015-12-21T19:00:00Z",
        "last_observed": "2015-12-21T19:00:00Z",
        "number_observed": 0,
        "objects": {"0": {"type": "file", "size": -1}}
    }"#;

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn run(paths: Vec<PathBuf>) -> u8 {
        let args = ValidateArgs { paths, json: false };
        run_validate(&args, &ValidationConfig::default()).unwrap()
    }

    #[test]
    fn valid_file_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run(vec![write(&dir, "ok.json", VALID)]), 0);
    }

    #[test]
    fn invalid_file_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![write(&dir, "ok.json", VALID), write(&dir, "bad.json", INVALID)];
        assert_eq!(run(paths), EXIT_INVALID);
    }

    #[test]
    fn missing_file_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![write(&dir, "bad.json", INVALID), dir.path().join("absent.json")];
        assert_eq!(run(paths), EXIT_OPERATIONAL);
    }

    #[test]
    fn text_report_lists_every_defect() {
        let parser = Parser::new(registry::global());
        let outcome = Outcome::Invalid(parser.parse(INVALID).unwrap_err());
        let report = text_report(Path::new("bad.json"), &outcome);
        assert!(report.starts_with("bad.json: FAIL (2 defects)\n"), "{report}");
        assert!(report.contains("number_observed"));
        assert!(report.contains("embedded object \"0\""));
    }

    #[test]
    fn text_report_shows_type_and_id() {
        let parser = Parser::new(registry::global());
        let outcome = Outcome::Valid(parser.parse(VALID).unwrap());
        assert_eq!(text_report(Path::new("ok.json"), &outcome), "ok.json: OK domain-name -\n");
    }

    #[test]
    fn json_report_for_malformed_input() {
        let parser = Parser::new(registry::global());
        let outcome = Outcome::Invalid(parser.parse("{").unwrap_err());
        let report = json_report(Path::new("broken.json"), &outcome);
        assert_eq!(report["valid"], false);
        assert!(report["type"].is_null());
        assert_eq!(report["defects"].as_array().unwrap().len(), 1);
    }
}
