//! `observed-data`: a count of observations of a set of embedded observables
//! over a time window.

use stix_core::{StixId, Timestamp};

use crate::error::ValidationError;
use crate::property::{Constraint, ObjectClass, PropertyDef, PropertyKind, Rule, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::{put, Fields, ObjectMap, PropertyMap};

use super::common::{build_typed, DomainCommon, DomainDefaults};
use super::{StixObject, StixType};

/// An `observed-data` domain object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedData {
    common: DomainCommon,
    first_observed: Timestamp,
    last_observed: Timestamp,
    number_observed: i64,
    objects: ObjectMap,
}

impl ObservedData {
    /// Start building an `observed-data` object.
    pub fn builder() -> ObservedDataBuilder {
        ObservedDataBuilder::default()
    }

    /// Object identifier.
    pub fn id(&self) -> &StixId {
        self.common.id()
    }

    /// Common domain properties.
    pub fn common(&self) -> &DomainCommon {
        &self.common
    }

    /// Creation time.
    pub fn created(&self) -> &Timestamp {
        self.common.created()
    }

    /// Last modification time.
    pub fn modified(&self) -> &Timestamp {
        self.common.modified()
    }

    /// Identity that created the object.
    pub fn created_by_ref(&self) -> Option<&StixId> {
        self.common.created_by_ref()
    }

    /// Start of the observation window.
    pub fn first_observed(&self) -> &Timestamp {
        &self.first_observed
    }

    /// End of the observation window.
    pub fn last_observed(&self) -> &Timestamp {
        &self.last_observed
    }

    /// How many times the observables were seen. Always at least 1.
    pub fn number_observed(&self) -> i64 {
        self.number_observed
    }

    /// Embedded observables in the order they were given.
    pub fn objects(&self) -> &ObjectMap {
        &self.objects
    }
}

impl StixType for ObservedData {
    const TYPE: &'static str = "observed-data";

    fn schema() -> Schema {
        Schema::domain(Self::TYPE)
            .with_property(PropertyDef::required("first_observed", PropertyKind::Timestamp))
            .with_property(PropertyDef::required("last_observed", PropertyKind::Timestamp))
            .with_property(
                PropertyDef::required("number_observed", PropertyKind::Integer).with(Constraint::Min(1)),
            )
            .with_property(
                PropertyDef::required("objects", PropertyKind::Objects)
                    .with(Constraint::ObjectClass(ObjectClass::Observable))
                    .with(Constraint::NonEmpty),
            )
            .with_rule(Rule::not_after("first_observed", "last_observed"))
    }

    fn from_properties(props: PropertyMap) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(Self::TYPE, props);
        let common = DomainCommon::take(&mut fields)?;
        let first_observed = fields.timestamp("first_observed");
        let last_observed = fields.timestamp("last_observed");
        let number_observed = fields.integer("number_observed");
        let objects = fields.objects("objects");
        Ok(Self {
            common,
            first_observed: fields.require("first_observed", first_observed)?,
            last_observed: fields.require("last_observed", last_observed)?,
            number_observed: fields.require("number_observed", number_observed)?,
            objects: fields.require("objects", objects)?,
        })
    }

    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        self.common.write(Self::TYPE, &mut props);
        props.insert("first_observed".into(), self.first_observed.into());
        props.insert("last_observed".into(), self.last_observed.into());
        props.insert("number_observed".into(), self.number_observed.into());
        props.insert("objects".into(), self.objects.clone().into());
        props
    }
}

/// Builder for [`ObservedData`].
#[derive(Debug, Clone, Default)]
pub struct ObservedDataBuilder {
    common: DomainDefaults,
    first_observed: Option<Timestamp>,
    last_observed: Option<Timestamp>,
    number_observed: Option<i64>,
    objects: ObjectMap,
}

impl ObservedDataBuilder {
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

    /// Set the start of the observation window.
    pub fn first_observed(mut self, ts: Timestamp) -> Self {
        self.first_observed = Some(ts);
        self
    }

    /// Set the end of the observation window.
    pub fn last_observed(mut self, ts: Timestamp) -> Self {
        self.last_observed = Some(ts);
        self
    }

    /// Set the observation count.
    pub fn number_observed(mut self, n: i64) -> Self {
        self.number_observed = Some(n);
        self
    }

    /// Append an embedded observable under `key`.
    pub fn object(mut self, key: impl Into<String>, object: impl Into<StixObject>) -> Self {
        self.objects.insert(key.into(), object.into());
        self
    }

    /// Validate and build against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build(self) -> Result<ObservedData, ValidationError> {
        self.build_with(registry::global())
    }

    /// Validate and build, dispatching embedded objects through `registry`.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build_with(self, registry: &TypeRegistry) -> Result<ObservedData, ValidationError> {
        let mut props = PropertyMap::new();
        self.common.write(ObservedData::TYPE, &mut props);
        put(&mut props, "first_observed", self.first_observed);
        put(&mut props, "last_observed", self.last_observed);
        put(&mut props, "number_observed", self.number_observed);
        props.insert("objects".into(), self.objects.into());
        build_typed(registry, props)
    }
}
