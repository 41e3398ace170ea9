//! Objects of types declared at registration time.

use stix_core::StixId;

use crate::error::ValidationError;
use crate::property::{ObjectClass, Schema};
use crate::value::{PropertyMap, TypedValue};

use super::StixObject;

/// An object of a registered custom type.
///
/// Properties are kept as checked values in schema order, `type` included.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomObject {
    type_name: String,
    class: ObjectClass,
    properties: PropertyMap,
}

impl CustomObject {
    /// Registry constructor for custom types.
    pub(crate) fn construct(schema: &Schema, properties: PropertyMap) -> Result<StixObject, ValidationError> {
        Ok(StixObject::Custom(Self {
            type_name: schema.type_name().to_string(),
            class: schema.class(),
            properties,
        }))
    }

    /// Discriminator value.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Domain or observable.
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// Object identifier, when set.
    pub fn id(&self) -> Option<&StixId> {
        match self.properties.get("id") {
            Some(TypedValue::Identifier(id)) => Some(id),
            _ => None,
        }
    }

    /// One property by name.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.properties.get(name)
    }

    /// All properties in schema order.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}
