//! # Validation Engine
//!
//! Turns a raw property mapping into an immutable typed object, or into a
//! [`ValidationError`] listing every defect found.
//!
//! ## Algorithm
//!
//! 1. Look up the schema for the discriminator (`UnknownType`).
//! 2. Required properties that are absent or `null` (`MissingProperty`).
//! 3. Each present declared property is checked against its kind and
//!    constraints (`InvalidPropertyValue`, `NestedValidationError`).
//! 4. Properties the schema does not declare (`UnexpectedProperty`).
//! 5. Cross-field rules (`ConstraintViolation`).
//! 6. The registry constructor assembles the variant from the checked
//!    values, stored in schema order.
//!
//! Steps 2-5 always all run, so one pass reports everything. Embedded
//! objects re-enter step 1 through [`EmbeddedDispatch`] one level deeper.
//!
//! ## Thread Safety
//!
//! `Validator` only borrows the registry and holds no mutable state;
//! validators may run concurrently on independent inputs.

use serde_json::{Map, Value};

use crate::config::ValidationConfig;
use crate::error::{Defect, ValidationError};
use crate::objects::StixObject;
use crate::property::{json_kind, EmbeddedDispatch, ObjectClass, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::PropertyMap;

/// Validates raw property mappings against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r TypeRegistry,
    config: ValidationConfig,
    depth: usize,
}

impl<'r> Validator<'r> {
    /// A validator over `registry` with default settings.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: ValidationConfig::default(),
            depth: 0,
        }
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry this validator dispatches through.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Validate `raw` as an object of `type_name`.
    ///
    /// # Errors
    ///
    /// Returns every defect found in the object and its embedded objects.
    pub fn validate(&self, type_name: &str, raw: &Map<String, Value>) -> Result<StixObject, ValidationError> {
        let entry = self
            .registry
            .lookup(type_name)
            .map_err(|defect| ValidationError::new(Some(type_name), vec![defect]))?;
        let props = self.check_schema(entry.schema(), raw)?;
        entry.construct(props)
    }

    /// Check `raw` against `schema` without constructing the object.
    ///
    /// Embedded objects are still dispatched through the registry.
    ///
    /// # Errors
    ///
    /// Returns every defect found.
    pub fn check_schema(&self, schema: &Schema, raw: &Map<String, Value>) -> Result<PropertyMap, ValidationError> {
        let owner = schema.type_name();
        let mut defects = Vec::new();
        let mut props = PropertyMap::with_capacity(raw.len());
        let embedded = self.descend();

        for def in schema.properties() {
            match raw.get(def.name()).filter(|v| !v.is_null()) {
                None if def.is_required() => {
                    defects.push(Defect::MissingProperty(def.name().to_string()));
                }
                None => {}
                Some(value) => match def.check(owner, value, &embedded) {
                    Ok(typed) => {
                        props.insert(def.name().to_string(), typed);
                    }
                    Err(found) => defects.extend(found),
                },
            }
        }

        for (name, value) in raw {
            if !value.is_null() && schema.property(name).is_none() {
                defects.push(Defect::UnexpectedProperty(name.clone()));
            }
        }

        defects.extend(schema.rules().iter().filter_map(|rule| rule.evaluate(raw, &props)));

        if defects.is_empty() {
            tracing::trace!(type_name = owner, depth = self.depth, "object validated");
            Ok(props)
        } else {
            tracing::debug!(
                type_name = owner,
                depth = self.depth,
                defects = defects.len(),
                "object failed validation"
            );
            Err(ValidationError::new(Some(owner), defects))
        }
    }

    fn descend(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }
}

impl EmbeddedDispatch for Validator<'_> {
    fn dispatch(&self, raw: &Map<String, Value>, class: Option<ObjectClass>) -> Result<StixObject, ValidationError> {
        let type_name = match raw.get("type") {
            None | Some(Value::Null) => {
                return Err(ValidationError::new(
                    None,
                    vec![Defect::MissingProperty("type".to_string())],
                ))
            }
            Some(Value::String(t)) => t.as_str(),
            Some(other) => {
                return Err(ValidationError::new(
                    None,
                    vec![Defect::invalid("type", "a string", json_kind(other))],
                ))
            }
        };

        if self.depth > self.config.max_nesting_depth {
            return Err(ValidationError::new(
                Some(type_name),
                vec![Defect::ConstraintViolation {
                    properties: vec!["type".to_string()],
                    reason: format!(
                        "embedded objects may nest at most {} levels deep",
                        self.config.max_nesting_depth
                    ),
                }],
            ));
        }

        let entry = self
            .registry
            .lookup(type_name)
            .map_err(|defect| ValidationError::new(Some(type_name), vec![defect]))?;
        if let Some(required) = class {
            if entry.schema().class() != required {
                return Err(ValidationError::new(
                    Some(type_name),
                    vec![Defect::invalid(
                        "type",
                        format!("an {required} object type"),
                        format!("\"{type_name}\" ({} object)", entry.schema().class()),
                    )],
                ));
            }
        }

        let props = self.check_schema(entry.schema(), raw)?;
        entry.construct(props)
    }
}

/// Validate against the global registry with default settings.
///
/// # Errors
///
/// Returns every defect found.
pub fn validate(type_name: &str, raw: &Map<String, Value>) -> Result<StixObject, ValidationError> {
    Validator::new(registry::global()).validate(type_name, raw)
}
