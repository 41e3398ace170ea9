//! # Canonical Serialization — JCS Byte Production
//!
//! [`CanonicalBytes`] is the only input accepted when deriving deterministic
//! identifiers. Values pass a float-rejection check and are then serialized
//! with `serde_jcs` (RFC 8785): sorted keys, compact separators, UTF-8.
//!
//! Floats are rejected because their JCS rendering is not reproducible
//! across producers; every numeric property in the object model is an
//! integer.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is [`CanonicalBytes::new`].
/// - No number in the encoded value is a float.
/// - Object keys are sorted; separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value contains
    /// a non-integer number, or [`CanonicalizationError::SerializationFailed`]
    /// if serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// The canonical byte sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The canonical text. JCS output is always UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(items) => items.iter().try_for_each(reject_floats),
    }
}
