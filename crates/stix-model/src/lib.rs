//! # stix-model — Object Modeling, Validation & Canonical Serialization
//!
//! Typed STIX 2.1 objects behind a discriminator-dispatched parser, a
//! schema-driven validation engine that reports every defect at once, and
//! the one canonical JSON rendering used for equality and fixtures.
//!
//! ## Data Flow
//!
//! ```text
//! text / serde_json::Value
//!   → parse        (discriminator)
//!   → registry     (schema + constructor lookup)
//!   → validate     (property kinds, constraints, cross-field rules,
//!                   embedded objects through the same entry point)
//!   → StixObject   (immutable)
//!   → serialize    (sorted keys, `objects` in given order)
//! ```
//!
//! ## Example
//!
//! ```
//! let text = r#"{"type": "domain-name", "value": "example.com"}"#;
//! let object = stix_model::parse(text).unwrap();
//! assert_eq!(object.type_name(), "domain-name");
//! assert_eq!(
//!     stix_model::serialize_compact(&object),
//!     r#"{"type":"domain-name","value":"example.com"}"#
//! );
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `stix-core` internally.
//! - No I/O. Every operation is a pure function of its input and the frozen
//!   registry.
//! - Builders run the same validation engine as the parser.

pub mod config;
pub mod error;
pub mod objects;
pub mod parse;
pub mod property;
pub mod registry;
pub mod serialize;
pub mod validate;
pub mod value;

pub use config::ValidationConfig;
pub use error::{Defect, DefectKind, ParseError, RegistryError, ValidationError};
pub use objects::{
    Artifact, ArtifactBuilder, CustomObject, DomainCommon, DomainName, DomainNameBuilder, File,
    FileBuilder, Identity, IdentityBuilder, Ipv4Addr, Ipv4AddrBuilder, ObservedData,
    ObservedDataBuilder, StixObject, StixType, ENCRYPTION_ALGORITHMS,
};
pub use parse::{parse, parse_map, parse_value, Parser};
pub use property::{Constraint, EmbeddedDispatch, ObjectClass, PropertyDef, PropertyKind, Rule, Schema};
pub use registry::{
    deterministic_id, install_global, Constructor, CustomProperty, CustomType, TypeEntry, TypeRegistry,
};
pub use serialize::{serialize, serialize_compact, to_json_value};
pub use validate::{validate, Validator};
pub use value::{ObjectMap, PropertyMap, TypedValue};
