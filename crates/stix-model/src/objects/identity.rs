//! `identity`: an individual, organization or group. Target of
//! `created_by_ref`.

use stix_core::{StixId, Timestamp};

use crate::error::ValidationError;
use crate::property::{Constraint, PropertyDef, PropertyKind, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::{put, Fields, PropertyMap};

use super::common::{build_typed, DomainCommon, DomainDefaults};
use super::StixType;

/// An `identity` domain object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    common: DomainCommon,
    name: String,
    identity_class: Option<String>,
    description: Option<String>,
    contact_information: Option<String>,
}

impl Identity {
    /// Start building an `identity` object.
    pub fn builder() -> IdentityBuilder {
        IdentityBuilder::default()
    }

    /// Object identifier.
    pub fn id(&self) -> &StixId {
        self.common.id()
    }

    /// Common domain properties.
    pub fn common(&self) -> &DomainCommon {
        &self.common
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of entity (`individual`, `organization`, ...).
    pub fn identity_class(&self) -> Option<&str> {
        self.identity_class.as_deref()
    }

    /// Free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// How to reach the entity.
    pub fn contact_information(&self) -> Option<&str> {
        self.contact_information.as_deref()
    }
}

impl StixType for Identity {
    const TYPE: &'static str = "identity";

    fn schema() -> Schema {
        Schema::domain(Self::TYPE)
            .with_property(PropertyDef::required("name", PropertyKind::String).with(Constraint::NonEmpty))
            .with_property(PropertyDef::optional("identity_class", PropertyKind::String))
            .with_property(PropertyDef::optional("description", PropertyKind::String))
            .with_property(PropertyDef::optional("contact_information", PropertyKind::String))
    }

    fn from_properties(props: PropertyMap) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(Self::TYPE, props);
        let common = DomainCommon::take(&mut fields)?;
        let name = fields.string("name");
        Ok(Self {
            common,
            name: fields.require("name", name)?,
            identity_class: fields.string("identity_class"),
            description: fields.string("description"),
            contact_information: fields.string("contact_information"),
        })
    }

    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.common.write(Self::TYPE, &mut props);
        props.insert("name".into(), self.name.clone().into());
        put(&mut props, "identity_class", self.identity_class.clone());
        put(&mut props, "description", self.description.clone());
        put(&mut props, "contact_information", self.contact_information.clone());
        props
    }
}

/// Builder for [`Identity`].
#[derive(Debug, Clone, Default)]
pub struct IdentityBuilder {
    common: DomainDefaults,
    name: Option<String>,
    identity_class: Option<String>,
    description: Option<String>,
    contact_information: Option<String>,
}

impl IdentityBuilder {
    /// Set the identifier (default: a fresh random id).
    pub fn id(mut self, id: StixId) -> Self {
        self.common.id = Some(id);
        self
    }

    /// Set the creation time (default: now).
    pub fn created(mut self, created: Timestamp) -> Self {
        self.common.created = Some(created);
        self
    }

    /// Set the modification time (default: `created`).
    pub fn modified(mut self, modified: Timestamp) -> Self {
        self.common.modified = Some(modified);
        self
    }

    /// Set the creating identity.
    pub fn created_by_ref(mut self, identity: StixId) -> Self {
        self.common.created_by_ref = Some(identity);
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the entity kind.
    pub fn identity_class(mut self, class: impl Into<String>) -> Self {
        self.identity_class = Some(class.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the contact information.
    pub fn contact_information(mut self, contact: impl Into<String>) -> Self {
        self.contact_information = Some(contact.into());
        self
    }

    /// Validate and build against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build(self) -> Result<Identity, ValidationError> {
        self.build_with(registry::global())
    }

    /// Validate and build, dispatching embedded objects through `registry`.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build_with(self, registry: &TypeRegistry) -> Result<Identity, ValidationError> {
        let mut props = PropertyMap::new();
        self.common.write(Identity::TYPE, &mut props);
        put(&mut props, "name", self.name);
        put(&mut props, "identity_class", self.identity_class);
        put(&mut props, "description", self.description);
        put(&mut props, "contact_information", self.contact_information);
        build_typed(registry, props)
    }
}
