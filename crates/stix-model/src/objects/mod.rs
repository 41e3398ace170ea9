//! # Typed Objects
//!
//! [`StixObject`] is the closed set of object variants. Each built-in type
//! is a fixed record of typed fields implementing [`StixType`]; custom types
//! declared at registration time are carried as [`CustomObject`].
//!
//! Objects are immutable. They are produced by the parser or by a
//! per-type builder, and both paths run the same validation engine.

mod artifact;
mod common;
mod custom;
mod file;
mod identity;
mod network;
mod observed_data;

pub use artifact::{Artifact, ArtifactBuilder, ENCRYPTION_ALGORITHMS};
pub use common::DomainCommon;
pub use custom::CustomObject;
pub use file::{File, FileBuilder};
pub use identity::{Identity, IdentityBuilder};
pub use network::{DomainName, DomainNameBuilder, Ipv4Addr, Ipv4AddrBuilder};
pub use observed_data::{ObservedData, ObservedDataBuilder};

use stix_core::StixId;

use crate::error::ValidationError;
use crate::property::{ObjectClass, Schema};
use crate::value::{PropertyMap, TypedValue};

/// A built-in object type with a compiled-in schema.
pub trait StixType: Sized {
    /// Discriminator value.
    const TYPE: &'static str;

    /// The schema the validation engine checks this type against.
    fn schema() -> Schema;

    /// Assemble from properties that passed validation.
    ///
    /// # Errors
    ///
    /// Returns a `MissingProperty` defect if a required field is absent.
    fn from_properties(props: PropertyMap) -> Result<Self, ValidationError>;

    /// All set properties, `type` included, in schema order.
    fn to_properties(&self) -> PropertyMap;
}

/// Any validated object.
#[derive(Debug, Clone, PartialEq)]
pub enum StixObject {
    /// `observed-data`
    ObservedData(ObservedData),
    /// `identity`
    Identity(Identity),
    /// `artifact`
    Artifact(Artifact),
    /// `file`
    File(File),
    /// `ipv4-addr`
    Ipv4Addr(Ipv4Addr),
    /// `domain-name`
    DomainName(DomainName),
    /// A registered custom type.
    Custom(CustomObject),
}

impl StixObject {
    /// The discriminator value.
    pub fn type_name(&self) -> &str {
        match self {
            Self::ObservedData(_) => ObservedData::TYPE,
            Self::Identity(_) => Identity::TYPE,
            Self::Artifact(_) => Artifact::TYPE,
            Self::File(_) => File::TYPE,
            Self::Ipv4Addr(_) => Ipv4Addr::TYPE,
            Self::DomainName(_) => DomainName::TYPE,
            Self::Custom(c) => c.type_name(),
        }
    }

    /// Domain or observable.
    pub fn class(&self) -> ObjectClass {
        match self {
            Self::ObservedData(_) | Self::Identity(_) => ObjectClass::Domain,
            Self::Artifact(_) | Self::File(_) | Self::Ipv4Addr(_) | Self::DomainName(_) => {
                ObjectClass::Observable
            }
            Self::Custom(c) => c.class(),
        }
    }

    /// The object's identifier. Embedded observables may have none.
    pub fn id(&self) -> Option<&StixId> {
        match self {
            Self::ObservedData(o) => Some(o.id()),
            Self::Identity(o) => Some(o.id()),
            Self::Artifact(o) => o.id(),
            Self::File(o) => o.id(),
            Self::Ipv4Addr(o) => o.id(),
            Self::DomainName(o) => o.id(),
            Self::Custom(o) => o.id(),
        }
    }

    /// All set properties, `type` included, in schema order.
    pub fn to_properties(&self) -> PropertyMap {
        match self {
            Self::ObservedData(o) => o.to_properties(),
            Self::Identity(o) => o.to_properties(),
            Self::Artifact(o) => o.to_properties(),
            Self::File(o) => o.to_properties(),
            Self::Ipv4Addr(o) => o.to_properties(),
            Self::DomainName(o) => o.to_properties(),
            Self::Custom(o) => o.properties().clone(),
        }
    }

    /// One property value by name.
    pub fn get(&self, name: &str) -> Option<TypedValue> {
        self.to_properties().shift_remove(name)
    }

    /// The `observed-data` variant, if this is one.
    pub fn as_observed_data(&self) -> Option<&ObservedData> {
        match self {
            Self::ObservedData(o) => Some(o),
            _ => None,
        }
    }

    /// The `artifact` variant, if this is one.
    pub fn as_artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Artifact(o) => Some(o),
            _ => None,
        }
    }

    /// The custom variant, if this is one.
    pub fn as_custom(&self) -> Option<&CustomObject> {
        match self {
            Self::Custom(o) => Some(o),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for StixObject {
                fn from(o: $variant) -> Self {
                    Self::$variant(o)
                }
            }
        )*
    };
}

impl_from_variant!(ObservedData, Identity, Artifact, File, Ipv4Addr, DomainName);

impl From<CustomObject> for StixObject {
    fn from(o: CustomObject) -> Self {
        Self::Custom(o)
    }
}
