//! # Canonical Serializer
//!
//! One deterministic JSON rendering per object: keys sorted by Unicode code
//! point at every level, except inside an `objects` mapping, which keeps the
//! order its entries were given in. Absent optional properties are omitted.
//!
//! `serde_json` is built with `preserve_order`, so a [`Map`] emits keys in
//! insertion order; sorting happens here, once, while the map is built.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::objects::StixObject;
use crate::parse;
use crate::value::{PropertyMap, TypedValue};

/// Canonical JSON value of an object.
pub fn to_json_value(object: &StixObject) -> Value {
    Value::Object(properties_to_map(&object.to_properties()))
}

/// Canonical JSON text, 2-space indented.
pub fn serialize(object: &StixObject) -> String {
    format!("{:#}", to_json_value(object))
}

/// Canonical JSON text without whitespace.
pub fn serialize_compact(object: &StixObject) -> String {
    to_json_value(object).to_string()
}

/// Properties as a JSON map with sorted keys.
pub(crate) fn properties_to_map(props: &PropertyMap) -> Map<String, Value> {
    let mut entries: Vec<(&String, &TypedValue)> = props.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(name, value)| (name.clone(), value_to_json(value)))
        .collect()
}

/// JSON rendering of one checked value.
pub(crate) fn value_to_json(value: &TypedValue) -> Value {
    match value {
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Integer(n) => Value::from(*n),
        TypedValue::Timestamp(ts) => Value::String(ts.to_canonical_string()),
        TypedValue::Identifier(id) => Value::String(id.to_string()),
        TypedValue::Binary(b) => Value::String(b.as_str().to_string()),
        TypedValue::Hashes(hashes) => hashes
            .iter()
            .map(|(algorithm, digest)| (algorithm.to_string(), Value::String(digest.to_string())))
            .collect::<Map<String, Value>>()
            .into(),
        TypedValue::Objects(objects) => objects
            .iter()
            .map(|(key, object)| (key.clone(), to_json_value(object)))
            .collect::<Map<String, Value>>()
            .into(),
    }
}

impl Serialize for StixObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json_value(self).serialize(serializer)
    }
}

/// Deserializes through [`parse::parse_value`] against the global registry.
impl<'de> Deserialize<'de> for StixObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse::parse_value(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for StixObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}
