//! # Parser / Dispatcher
//!
//! Entry points that accept JSON text or an already-decoded value, read the
//! `type` discriminator and hand the mapping to the validation engine.
//!
//! The free functions use the process-wide registry ([`registry::global`]).
//! [`Parser`] takes an explicit registry for callers that register custom
//! types without installing them globally.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::config::ValidationConfig;
use crate::error::ParseError;
use crate::objects::StixObject;
use crate::property::json_kind;
use crate::registry::{self, TypeRegistry};
use crate::validate::Validator;

/// Parses records against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r TypeRegistry,
    config: ValidationConfig,
}

impl<'r> Parser<'r> {
    /// A parser over `registry` with default settings.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: ValidationConfig::default(),
        }
    }

    /// Replace the validation settings.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse JSON text.
    ///
    /// # Errors
    ///
    /// [`ParseError::MalformedInput`] for text that is not JSON, otherwise as
    /// [`Parser::parse_value`].
    pub fn parse(&self, text: &str) -> Result<StixObject, ParseError> {
        let value: Value = serde_json::from_str(text)?;
        self.parse_value(&value)
    }

    /// Parse a decoded JSON value.
    ///
    /// # Errors
    ///
    /// [`ParseError::NotAnObject`] for anything but an object, otherwise as
    /// [`Parser::parse_map`].
    pub fn parse_value(&self, value: &Value) -> Result<StixObject, ParseError> {
        match value {
            Value::Object(map) => self.parse_map(map),
            other => Err(ParseError::NotAnObject {
                found: json_kind(other),
            }),
        }
    }

    /// Parse a decoded JSON object.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingType`] or [`ParseError::InvalidDiscriminator`]
    /// when `type` is absent or not a string, and [`ParseError::Invalid`]
    /// with every defect when validation fails.
    pub fn parse_map(&self, map: &Map<String, Value>) -> Result<StixObject, ParseError> {
        let type_name = match map.get("type") {
            None | Some(Value::Null) => return Err(ParseError::MissingType),
            Some(Value::String(t)) => t.as_str(),
            Some(other) => {
                return Err(ParseError::InvalidDiscriminator {
                    found: json_kind(other),
                })
            }
        };
        tracing::trace!(type_name, properties = map.len(), "dispatching record");

        let object = Validator::new(self.registry)
            .with_config(self.config)
            .validate(type_name, map)?;
        Ok(object)
    }
}

/// Parse JSON text against the global registry.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse(text: &str) -> Result<StixObject, ParseError> {
    Parser::new(registry::global()).parse(text)
}

/// Parse a decoded JSON value against the global registry.
///
/// # Errors
///
/// See [`Parser::parse_value`].
pub fn parse_value(value: &Value) -> Result<StixObject, ParseError> {
    Parser::new(registry::global()).parse_value(value)
}

/// Parse a decoded JSON object against the global registry.
///
/// # Errors
///
/// See [`Parser::parse_map`].
pub fn parse_map(map: &Map<String, Value>) -> Result<StixObject, ParseError> {
    Parser::new(registry::global()).parse_map(map)
}

impl FromStr for StixObject {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefectKind;
    use serde_json::json;

    #[test]
    fn malformed_text_rejected() {
        assert!(matches!(parse("{\"type\": "), Err(ParseError::MalformedInput(_))));
    }

    #[test]
    fn non_object_rejected() {
        assert!(matches!(
            parse("[1, 2]"),
            Err(ParseError::NotAnObject { found: "an array" })
        ));
        assert!(matches!(
            parse_value(&json!("file")),
            Err(ParseError::NotAnObject { found: "a string" })
        ));
    }

    #[test]
    fn discriminator_checked_first() {
        assert!(matches!(parse("{}"), Err(ParseError::MissingType)));
        assert!(matches!(parse(r#"{"type": null}"#), Err(ParseError::MissingType)));
        assert!(matches!(
            parse(r#"{"type": 7}"#),
            Err(ParseError::InvalidDiscriminator { found: "a number" })
        ));
    }

    #[test]
    fn unknown_type_is_a_validation_failure() {
        let err = parse(r#"{"type": "x-unheard-of"}"#).unwrap_err();
        assert_eq!(err.validation().unwrap().kinds(), vec![DefectKind::UnknownType]);
    }

    #[test]
    fn observable_parses_without_defaults() {
        let object: StixObject = r#"{"type": "domain-name", "value": "example.com"}"#.parse().unwrap();
        assert_eq!(object.type_name(), "domain-name");
        assert!(object.id().is_none());
    }

    #[test]
    fn domain_object_needs_all_common_properties() {
        let err = parse(r#"{"type": "identity", "name": "ACME"}"#).unwrap_err();
        let missing: Vec<String> = err
            .validation()
            .unwrap()
            .defects()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(missing.len(), 3);
    }

    #[test]
    fn explicit_registry_is_used() {
        let registry = TypeRegistry::new();
        let err = Parser::new(&registry)
            .parse(r#"{"type": "file"}"#)
            .unwrap_err();
        assert!(err.validation().unwrap().contains(DefectKind::UnknownType));
    }
}
