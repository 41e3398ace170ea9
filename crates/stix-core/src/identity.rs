//! # Identifiers
//!
//! [`StixId`] is the `<type>--<uuid>` identifier carried by every object and
//! by every reference property (`created_by_ref`). The type prefix is kept
//! alongside the parsed UUID so callers can check that an id belongs to the
//! object that carries it, or that a reference points at the expected type.
//!
//! Type names follow the STIX naming rules: 3-250 characters, lowercase
//! ASCII letters, digits and single hyphens, no leading or trailing hyphen.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::PrimitiveError;

/// Namespace for deterministic identifiers of cyber-observable objects.
pub const SCO_ID_NAMESPACE: Uuid = Uuid::from_u128(0x00abedb4_aa42_466c_9c01_fed23315a9b7);

const ID_SEPARATOR: &str = "--";
const HYPHENATED_UUID_LEN: usize = 36;

/// Check a type name against the naming rules.
///
/// # Errors
///
/// Returns [`PrimitiveError::InvalidTypeName`] on violation.
pub fn validate_type_name(name: &str) -> Result<(), PrimitiveError> {
    let well_formed = (3..=250).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains(ID_SEPARATOR);
    if well_formed {
        Ok(())
    } else {
        Err(PrimitiveError::InvalidTypeName(name.to_string()))
    }
}

/// A STIX identifier: object type plus UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StixId {
    type_name: String,
    uuid: Uuid,
}

impl StixId {
    /// Create a fresh random (version 4) identifier for `type_name`.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidTypeName`] for malformed type names.
    pub fn new(type_name: &str) -> Result<Self, PrimitiveError> {
        Self::from_parts(type_name, Uuid::new_v4())
    }

    /// Build an identifier from a type name and an existing UUID.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidTypeName`] for malformed type names.
    pub fn from_parts(type_name: &str, uuid: Uuid) -> Result<Self, PrimitiveError> {
        validate_type_name(type_name)?;
        Ok(Self {
            type_name: type_name.to_string(),
            uuid,
        })
    }

    /// Deterministic (version 5) identifier over `name` in the SCO namespace.
    ///
    /// `name` is the canonical serialization of the object's ID-contributing
    /// properties.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidTypeName`] for malformed type names.
    pub fn deterministic(type_name: &str, name: &[u8]) -> Result<Self, PrimitiveError> {
        Self::from_parts(type_name, Uuid::new_v5(&SCO_ID_NAMESPACE, name))
    }

    /// Parse `<type>--<uuid>`.
    ///
    /// The UUID must be in hyphenated form. Upper-case hex digits are
    /// accepted and normalized to lower case.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidIdentifier`] when the separator is
    /// missing, the type prefix is malformed, or the UUID does not parse.
    pub fn parse(s: &str) -> Result<Self, PrimitiveError> {
        let invalid = |reason: &str| PrimitiveError::InvalidIdentifier {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (type_name, uuid_part) = s
            .split_once(ID_SEPARATOR)
            .ok_or_else(|| invalid("expected <type>--<uuid>"))?;
        validate_type_name(type_name).map_err(|_| invalid("malformed type prefix"))?;

        if uuid_part.len() != HYPHENATED_UUID_LEN {
            return Err(invalid("UUID must be in hyphenated form"));
        }
        let uuid = Uuid::parse_str(uuid_part).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            type_name: type_name.to_string(),
            uuid,
        })
    }

    /// The type prefix of this identifier.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The UUID part of this identifier.
    pub fn uuid(&self) -> &Uuid {
        &self.uuid
    }

    /// Whether this identifier belongs to an object of type `type_name`.
    pub fn is_type(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }
}

impl std::fmt::Display for StixId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}--{}", self.type_name, self.uuid.hyphenated())
    }
}

impl std::str::FromStr for StixId {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for StixId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StixId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
