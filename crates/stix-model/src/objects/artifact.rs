//! `artifact`: a binary payload carried either inline or by reference.
//!
//! Exactly one of the two forms must be used: an inline `payload_bin`, or a
//! `url` together with the `hashes` that pin its content.

use stix_core::{Binary, Hashes, StixId};

use crate::error::ValidationError;
use crate::property::{Constraint, PropertyDef, PropertyKind, Rule, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::{put, Fields, PropertyMap, TypedValue};

use super::common::build_typed;
use super::StixType;

/// Accepted values of `encryption_algorithm`.
pub const ENCRYPTION_ALGORITHMS: [&str; 3] = ["mime-type-indicated", "AES-256-GCM", "ChaCha20-Poly1305"];

/// An `artifact` observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    id: Option<StixId>,
    mime_type: Option<String>,
    payload_bin: Option<Binary>,
    url: Option<String>,
    hashes: Option<Hashes>,
    encryption_algorithm: Option<String>,
    decryption_key: Option<String>,
}

impl Artifact {
    /// Start building an `artifact` object.
    pub fn builder() -> ArtifactBuilder {
        ArtifactBuilder::default()
    }

    /// Object identifier, when set.
    pub fn id(&self) -> Option<&StixId> {
        self.id.as_ref()
    }

    /// MIME type of the payload.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Inline payload.
    pub fn payload_bin(&self) -> Option<&Binary> {
        self.payload_bin.as_ref()
    }

    /// Location of the payload.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Digests of the payload.
    pub fn hashes(&self) -> Option<&Hashes> {
        self.hashes.as_ref()
    }

    /// Algorithm the payload is encrypted with.
    pub fn encryption_algorithm(&self) -> Option<&str> {
        self.encryption_algorithm.as_deref()
    }

    /// Key to decrypt the payload.
    pub fn decryption_key(&self) -> Option<&str> {
        self.decryption_key.as_deref()
    }
}

impl StixType for Artifact {
    const TYPE: &'static str = "artifact";

    fn schema() -> Schema {
        Schema::observable(Self::TYPE)
            .with_property(PropertyDef::optional("mime_type", PropertyKind::String))
            .with_property(PropertyDef::optional("payload_bin", PropertyKind::Binary))
            .with_property(PropertyDef::optional("url", PropertyKind::String).with(Constraint::Url))
            .with_property(PropertyDef::optional("hashes", PropertyKind::Hashes))
            .with_property(
                PropertyDef::optional("encryption_algorithm", PropertyKind::String).with(Constraint::OneOf(
                    ENCRYPTION_ALGORITHMS.iter().map(|a| a.to_string()).collect(),
                )),
            )
            .with_property(PropertyDef::optional("decryption_key", PropertyKind::String))
            .with_rule(Rule::exactly_one_of(&[&["payload_bin"], &["url", "hashes"]]))
            .with_rule(Rule::requires("url", "hashes"))
            .with_rule(Rule::requires("decryption_key", "encryption_algorithm"))
            .with_id_contributing(&["hashes", "payload_bin"])
    }

    fn from_properties(props: PropertyMap) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(Self::TYPE, props);
        Ok(Self {
            id: fields.id("id"),
            mime_type: fields.string("mime_type"),
            payload_bin: fields.binary("payload_bin"),
            url: fields.string("url"),
            hashes: fields.hashes("hashes"),
            encryption_algorithm: fields.string("encryption_algorithm"),
            decryption_key: fields.string("decryption_key"),
        })
    }

    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("type".into(), TypedValue::from(Self::TYPE));
        put(&mut props, "id", self.id.clone());
        put(&mut props, "mime_type", self.mime_type.clone());
        put(&mut props, "payload_bin", self.payload_bin.clone());
        put(&mut props, "url", self.url.clone());
        put(&mut props, "hashes", self.hashes.clone());
        put(&mut props, "encryption_algorithm", self.encryption_algorithm.clone());
        put(&mut props, "decryption_key", self.decryption_key.clone());
        props
    }
}

/// Builder for [`Artifact`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactBuilder {
    id: Option<StixId>,
    mime_type: Option<String>,
    payload_bin: Option<Binary>,
    url: Option<String>,
    hashes: Option<Hashes>,
    encryption_algorithm: Option<String>,
    decryption_key: Option<String>,
}

impl ArtifactBuilder {
    /// Set the identifier.
    pub fn id(mut self, id: StixId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the MIME type.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the inline payload.
    pub fn payload_bin(mut self, payload: Binary) -> Self {
        self.payload_bin = Some(payload);
        self
    }

    /// Set the payload location.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the payload digests.
    pub fn hashes(mut self, hashes: Hashes) -> Self {
        self.hashes = Some(hashes);
        self
    }

    /// Set the encryption algorithm.
    pub fn encryption_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.encryption_algorithm = Some(algorithm.into());
        self
    }

    /// Set the decryption key.
    pub fn decryption_key(mut self, key: impl Into<String>) -> Self {
        self.decryption_key = Some(key.into());
        self
    }

    /// Validate and build against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build(self) -> Result<Artifact, ValidationError> {
        self.build_with(registry::global())
    }

    /// Validate and build, dispatching embedded objects through `registry`.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build_with(self, registry: &TypeRegistry) -> Result<Artifact, ValidationError> {
        build_typed(
            registry,
            Artifact {
                id: self.id,
                mime_type: self.mime_type,
                payload_bin: self.payload_bin,
                url: self.url,
                hashes: self.hashes,
                encryption_algorithm: self.encryption_algorithm,
                decryption_key: self.decryption_key,
            }
            .to_properties(),
        )
    }
}
