//! Properties shared by every domain object, and the builder plumbing.

use stix_core::{StixId, Timestamp};

use crate::error::ValidationError;
use crate::registry::TypeRegistry;
use crate::serialize::properties_to_map;
use crate::validate::Validator;
use crate::value::{put, Fields, PropertyMap, TypedValue};

use super::StixType;

/// `id`, `created`, `modified` and `created_by_ref` of a domain object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCommon {
    id: StixId,
    created: Timestamp,
    modified: Timestamp,
    created_by_ref: Option<StixId>,
}

impl DomainCommon {
    pub(crate) fn take(fields: &mut Fields) -> Result<Self, ValidationError> {
        let id = fields.id("id");
        let created = fields.timestamp("created");
        let modified = fields.timestamp("modified");
        Ok(Self {
            id: fields.require("id", id)?,
            created: fields.require("created", created)?,
            modified: fields.require("modified", modified)?,
            created_by_ref: fields.id("created_by_ref"),
        })
    }

    pub(crate) fn write(&self, type_name: &str, props: &mut PropertyMap) {
        props.insert("type".into(), TypedValue::from(type_name));
        props.insert("id".into(), self.id.clone().into());
        put(props, "created_by_ref", self.created_by_ref.clone());
        props.insert("created".into(), self.created.into());
        props.insert("modified".into(), self.modified.into());
    }

    /// Object identifier.
    pub fn id(&self) -> &StixId {
        &self.id
    }

    /// Creation time.
    pub fn created(&self) -> &Timestamp {
        &self.created
    }

    /// Last modification time.
    pub fn modified(&self) -> &Timestamp {
        &self.modified
    }

    /// Identity that created the object.
    pub fn created_by_ref(&self) -> Option<&StixId> {
        self.created_by_ref.as_ref()
    }
}

/// Builder state for the common domain properties.
///
/// Unset values default to a fresh random id, the current time for
/// `created`, and `created` for `modified`.
#[derive(Debug, Clone, Default)]
pub(crate) struct DomainDefaults {
    pub(crate) id: Option<StixId>,
    pub(crate) created: Option<Timestamp>,
    pub(crate) modified: Option<Timestamp>,
    pub(crate) created_by_ref: Option<StixId>,
}

impl DomainDefaults {
    pub(crate) fn write(self, type_name: &str, props: &mut PropertyMap) {
        let id = self.id.or_else(|| StixId::new(type_name).ok());
        let created = self.created.unwrap_or_else(Timestamp::now);
        let modified = self.modified.unwrap_or(created);

        props.insert("type".into(), TypedValue::from(type_name));
        put(props, "id", id);
        put(props, "created_by_ref", self.created_by_ref);
        props.insert("created".into(), created.into());
        props.insert("modified".into(), modified.into());
    }
}

/// Run builder output through the validation engine and assemble `T`.
///
/// Embedded objects are dispatched through `registry`.
pub(crate) fn build_typed<T: StixType>(
    registry: &TypeRegistry,
    props: PropertyMap,
) -> Result<T, ValidationError> {
    let raw = properties_to_map(&props);
    let validated = Validator::new(registry).check_schema(&T::schema(), &raw)?;
    T::from_properties(validated)
}
