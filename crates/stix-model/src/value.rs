//! # Typed Property Values
//!
//! A [`TypedValue`] is a property value that has passed its kind check.
//! Validated objects are assembled from a [`PropertyMap`] in schema order;
//! typed variants move their fields out of it with [`Fields`].

use indexmap::IndexMap;
use stix_core::{Binary, Hashes, StixId, Timestamp};

use crate::error::{Defect, ValidationError};
use crate::objects::StixObject;
use crate::property::PropertyKind;

/// Embedded objects keyed by their embedding key, in insertion order.
pub type ObjectMap = IndexMap<String, StixObject>;

/// Validated properties of one object, keyed by property name.
pub type PropertyMap = IndexMap<String, TypedValue>;

/// A property value that passed its kind check.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Free text.
    String(String),
    /// Whole number.
    Integer(i64),
    /// UTC instant, whole seconds.
    Timestamp(Timestamp),
    /// `<type>--<uuid>` identifier or reference.
    Identifier(StixId),
    /// Algorithm → digest mapping.
    Hashes(Hashes),
    /// base64 payload.
    Binary(Binary),
    /// Embedded objects.
    Objects(ObjectMap),
}

impl TypedValue {
    /// The kind this value was checked against.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::Integer(_) => PropertyKind::Integer,
            Self::Timestamp(_) => PropertyKind::Timestamp,
            Self::Identifier(_) => PropertyKind::Identifier,
            Self::Hashes(_) => PropertyKind::Hashes,
            Self::Binary(_) => PropertyKind::Binary,
            Self::Objects(_) => PropertyKind::Objects,
        }
    }

    /// Borrow as text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The timestamp, if this is one.
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Timestamp> for TypedValue {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<StixId> for TypedValue {
    fn from(id: StixId) -> Self {
        Self::Identifier(id)
    }
}

impl From<Hashes> for TypedValue {
    fn from(h: Hashes) -> Self {
        Self::Hashes(h)
    }
}

impl From<Binary> for TypedValue {
    fn from(b: Binary) -> Self {
        Self::Binary(b)
    }
}

impl From<ObjectMap> for TypedValue {
    fn from(objects: ObjectMap) -> Self {
        Self::Objects(objects)
    }
}

/// Insert `value` under `name` when present.
pub(crate) fn put<T: Into<TypedValue>>(props: &mut PropertyMap, name: &str, value: Option<T>) {
    if let Some(v) = value {
        props.insert(name.to_string(), v.into());
    }
}

/// Moves typed fields out of a validated [`PropertyMap`].
///
/// A field of the wrong kind reads as absent; `require` turns absence into
/// a `MissingProperty` defect.
pub(crate) struct Fields {
    type_name: String,
    props: PropertyMap,
}

impl Fields {
    pub(crate) fn new(type_name: &str, props: PropertyMap) -> Self {
        Self {
            type_name: type_name.to_string(),
            props,
        }
    }

    pub(crate) fn string(&mut self, name: &str) -> Option<String> {
        match self.props.shift_remove(name) {
            Some(TypedValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn integer(&mut self, name: &str) -> Option<i64> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Integer(n)) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn timestamp(&mut self, name: &str) -> Option<Timestamp> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Timestamp(ts)) => Some(ts),
            _ => None,
        }
    }

    pub(crate) fn id(&mut self, name: &str) -> Option<StixId> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Identifier(id)) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn hashes(&mut self, name: &str) -> Option<Hashes> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Hashes(h)) => Some(h),
            _ => None,
        }
    }

    pub(crate) fn binary(&mut self, name: &str) -> Option<Binary> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Binary(b)) => Some(b),
            _ => None,
        }
    }

    pub(crate) fn objects(&mut self, name: &str) -> Option<ObjectMap> {
        match self.props.shift_remove(name) {
            Some(TypedValue::Objects(o)) => Some(o),
            _ => None,
        }
    }

    pub(crate) fn require<T>(&self, name: &str, value: Option<T>) -> Result<T, ValidationError> {
        value.ok_or_else(|| {
            ValidationError::new(
                Some(&self.type_name),
                vec![Defect::MissingProperty(name.to_string())],
            )
        })
    }
}
