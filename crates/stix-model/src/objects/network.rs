//! Network address observables: `ipv4-addr` and `domain-name`.

use stix_core::StixId;

use crate::error::ValidationError;
use crate::property::{Constraint, PropertyDef, PropertyKind, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::{put, Fields, PropertyMap, TypedValue};

use super::common::build_typed;
use super::StixType;

macro_rules! value_observable {
    (
        $(#[$doc:meta])*
        $name:ident, $builder:ident, $type_name:literal, $constraint:expr
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            id: Option<StixId>,
            value: String,
        }

        impl $name {
            /// Start building this object.
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Object identifier, when set.
            pub fn id(&self) -> Option<&StixId> {
                self.id.as_ref()
            }

            /// The address.
            pub fn value(&self) -> &str {
                &self.value
            }
        }

        impl StixType for $name {
            const TYPE: &'static str = $type_name;

            fn schema() -> Schema {
                Schema::observable(Self::TYPE)
                    .with_property(PropertyDef::required("value", PropertyKind::String).with($constraint))
                    .with_id_contributing(&["value"])
            }

            fn from_properties(props: PropertyMap) -> Result<Self, ValidationError> {
                let mut fields = Fields::new(Self::TYPE, props);
                let value = fields.string("value");
                Ok(Self {
                    id: fields.id("id"),
                    value: fields.require("value", value)?,
                })
            }

            fn to_properties(&self) -> PropertyMap {
                let mut props = PropertyMap::new();
                props.insert("type".into(), TypedValue::from(Self::TYPE));
                put(&mut props, "id", self.id.clone());
                props.insert("value".into(), self.value.clone().into());
                props
            }
        }

        #[doc = concat!("Builder for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Default)]
        pub struct $builder {
            id: Option<StixId>,
            value: Option<String>,
        }

        impl $builder {
            /// Set the identifier.
            pub fn id(mut self, id: StixId) -> Self {
                self.id = Some(id);
                self
            }

            /// Set the address.
            pub fn value(mut self, value: impl Into<String>) -> Self {
                self.value = Some(value.into());
                self
            }

            /// Validate and build against the process-wide registry.
            ///
            /// # Errors
            ///
            /// Returns every defect of the assembled properties.
            pub fn build(self) -> Result<$name, ValidationError> {
                self.build_with(registry::global())
            }

            /// Validate and build, dispatching embedded objects through `registry`.
            ///
            /// # Errors
            ///
            /// Returns every defect of the assembled properties.
            pub fn build_with(self, registry: &TypeRegistry) -> Result<$name, ValidationError> {
                let mut props = PropertyMap::new();
                props.insert("type".into(), TypedValue::from($type_name));
                put(&mut props, "id", self.id);
                put(&mut props, "value", self.value);
                build_typed(registry, props)
            }
        }
    };
}

value_observable!(
    /// An `ipv4-addr` observable: one address or CIDR block.
    Ipv4Addr,
    Ipv4AddrBuilder,
    "ipv4-addr",
    Constraint::Ipv4
);

value_observable!(
    /// A `domain-name` observable.
    DomainName,
    DomainNameBuilder,
    "domain-name",
    Constraint::NonEmpty
);
