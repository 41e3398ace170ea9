//! # Error Taxonomy
//!
//! Validation never stops at the first problem. Every defect found in one
//! object is collected into a [`ValidationError`], and failures of embedded
//! objects are attached per embedding key as
//! [`Defect::NestedValidationError`] so sibling objects are still checked.
//!
//! [`ParseError`] is the single error channel of the parser: malformed
//! input, a missing or unusable discriminator, or a wrapped
//! [`ValidationError`].

use std::fmt;

use thiserror::Error;

/// The category of a [`Defect`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectKind {
    /// Discriminator not in the type registry.
    UnknownType,
    /// Required property absent.
    MissingProperty,
    /// Property not declared by the schema.
    UnexpectedProperty,
    /// Property present but fails its kind check or format constraint.
    InvalidPropertyValue,
    /// A cross-field rule failed.
    ConstraintViolation,
    /// An embedded object failed validation.
    NestedValidationError,
}

/// One problem found while validating an object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Defect {
    /// The discriminator is not registered.
    #[error("unknown object type \"{0}\"")]
    UnknownType(String),

    /// A required property is absent.
    #[error("missing required property \"{0}\"")]
    MissingProperty(String),

    /// A property is not declared by the schema.
    #[error("unexpected property \"{0}\"")]
    UnexpectedProperty(String),

    /// A property value fails its kind check or format constraint.
    #[error("invalid value for \"{property}\": expected {expected}, got {actual}")]
    InvalidPropertyValue {
        /// Offending property.
        property: String,
        /// Expected value shape.
        expected: String,
        /// Rendering of the rejected value.
        actual: String,
    },

    /// A cross-field rule failed.
    #[error("constraint violated on {}: {reason}", .properties.join(", "))]
    ConstraintViolation {
        /// Properties involved in the rule.
        properties: Vec<String>,
        /// What the rule requires.
        reason: String,
    },

    /// An embedded object failed validation.
    #[error("embedded object \"{key}\" in \"{property}\" is invalid: {error}")]
    NestedValidationError {
        /// Property holding the embedded objects.
        property: String,
        /// Embedding key of the failing object.
        key: String,
        /// The embedded object's own defects.
        error: Box<ValidationError>,
    },
}

impl Defect {
    /// The category of this defect.
    pub fn kind(&self) -> DefectKind {
        match self {
            Self::UnknownType(_) => DefectKind::UnknownType,
            Self::MissingProperty(_) => DefectKind::MissingProperty,
            Self::UnexpectedProperty(_) => DefectKind::UnexpectedProperty,
            Self::InvalidPropertyValue { .. } => DefectKind::InvalidPropertyValue,
            Self::ConstraintViolation { .. } => DefectKind::ConstraintViolation,
            Self::NestedValidationError { .. } => DefectKind::NestedValidationError,
        }
    }

    pub(crate) fn invalid(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidPropertyValue {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Every defect found in one object.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ValidationError {
    type_name: Option<String>,
    defects: Vec<Defect>,
}

impl ValidationError {
    /// Build an error for an object of `type_name` (if it had a usable one).
    pub fn new(type_name: Option<&str>, defects: Vec<Defect>) -> Self {
        Self {
            type_name: type_name.map(str::to_string),
            defects,
        }
    }

    /// The discriminator of the failing object, when it had one.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// All defects, in the order they were found.
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// The kind of each defect, in order.
    pub fn kinds(&self) -> Vec<DefectKind> {
        self.defects.iter().map(Defect::kind).collect()
    }

    /// Whether any top-level defect is of `kind`.
    pub fn contains(&self, kind: DefectKind) -> bool {
        self.defects.iter().any(|d| d.kind() == kind)
    }

    /// Number of top-level defects.
    pub fn len(&self) -> usize {
        self.defects.len()
    }

    /// Returns true if no defect was recorded.
    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    /// Consumes self and returns the defects.
    pub fn into_defects(self) -> Vec<Defect> {
        self.defects
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(t) => write!(f, "{t} object failed validation")?,
            None => write!(f, "object failed validation")?,
        }
        write!(f, " with {} defect(s)", self.defects.len())?;
        for defect in &self.defects {
            write!(f, "\n  - {defect}")?;
        }
        Ok(())
    }
}

/// Failures of the parser entry points.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input text is not well-formed JSON.
    #[error("malformed JSON input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Input is JSON but not an object.
    #[error("expected a JSON object, got {found}")]
    NotAnObject {
        /// JSON kind of the input.
        found: &'static str,
    },

    /// The object has no `type` property.
    #[error("object has no \"type\" property")]
    MissingType,

    /// The `type` property is not a string.
    #[error("\"type\" must be a string, got {found}")]
    InvalidDiscriminator {
        /// JSON kind of the `type` value.
        found: &'static str,
    },

    /// The object failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ParseError {
    /// The wrapped validation error, if this is one.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

/// Failures while registering types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type with this name is already registered.
    #[error("type \"{0}\" is already registered")]
    DuplicateType(String),

    /// The type name violates the naming rules.
    #[error("invalid type name \"{0}\" (expected 3-250 characters of a-z, 0-9 and single hyphens)")]
    InvalidTypeName(String),

    /// A property name violates the naming rules.
    #[error("invalid property name \"{property}\" on type \"{type_name}\" (expected 3-250 characters of a-z, 0-9 and _)")]
    InvalidPropertyName {
        /// Type being registered.
        type_name: String,
        /// Offending property.
        property: String,
    },

    /// A custom property redefines a common property.
    #[error("property \"{property}\" on type \"{type_name}\" is reserved")]
    ReservedProperty {
        /// Type being registered.
        type_name: String,
        /// Offending property.
        property: String,
    },

    /// An ID-contributing property is not declared on the type.
    #[error("ID-contributing property \"{property}\" is not declared on type \"{type_name}\"")]
    UndeclaredIdProperty {
        /// Type being registered.
        type_name: String,
        /// Offending property.
        property: String,
    },

    /// The process-wide registry has already been initialized.
    #[error("the global type registry is already initialized")]
    AlreadyInitialized,
}
