//! `file`: properties of a file on disk.

use stix_core::{Hashes, StixId};

use crate::error::ValidationError;
use crate::property::{Constraint, PropertyDef, PropertyKind, Schema};
use crate::registry::{self, TypeRegistry};
use crate::value::{put, Fields, PropertyMap, TypedValue};

use super::common::build_typed;
use super::StixType;

/// A `file` observable. Every property is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    id: Option<StixId>,
    name: Option<String>,
    size: Option<i64>,
    mime_type: Option<String>,
    hashes: Option<Hashes>,
}

impl File {
    /// Start building a `file` object.
    pub fn builder() -> FileBuilder {
        FileBuilder::default()
    }

    /// Object identifier, when set.
    pub fn id(&self) -> Option<&StixId> {
        self.id.as_ref()
    }

    /// File name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Size in bytes.
    pub fn size(&self) -> Option<i64> {
        self.size
    }

    /// MIME type.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Content digests.
    pub fn hashes(&self) -> Option<&Hashes> {
        self.hashes.as_ref()
    }
}

impl StixType for File {
    const TYPE: &'static str = "file";

    fn schema() -> Schema {
        Schema::observable(Self::TYPE)
            .with_property(PropertyDef::optional("name", PropertyKind::String))
            .with_property(PropertyDef::optional("size", PropertyKind::Integer).with(Constraint::Min(0)))
            .with_property(PropertyDef::optional("mime_type", PropertyKind::String))
            .with_property(PropertyDef::optional("hashes", PropertyKind::Hashes))
            .with_id_contributing(&["hashes", "name"])
    }

    fn from_properties(props: PropertyMap) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(Self::TYPE, props);
        Ok(Self {
            id: fields.id("id"),
            name: fields.string("name"),
            size: fields.integer("size"),
            mime_type: fields.string("mime_type"),
            hashes: fields.hashes("hashes"),
        })
    }

    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("type".into(), TypedValue::from(Self::TYPE));
        put(&mut props, "id", self.id.clone());
        put(&mut props, "name", self.name.clone());
        put(&mut props, "size", self.size);
        put(&mut props, "mime_type", self.mime_type.clone());
        put(&mut props, "hashes", self.hashes.clone());
        props
    }
}

/// Builder for [`File`].
#[derive(Debug, Clone, Default)]
pub struct FileBuilder {
    inner: File,
}

impl FileBuilder {
    /// Set the identifier.
    pub fn id(mut self, id: StixId) -> Self {
        self.inner.id = Some(id);
        self
    }

    /// Set the file name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    /// Set the size in bytes.
    pub fn size(mut self, size: i64) -> Self {
        self.inner.size = Some(size);
        self
    }

    /// Set the MIME type.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.inner.mime_type = Some(mime_type.into());
        self
    }

    /// Set the content digests.
    pub fn hashes(mut self, hashes: Hashes) -> Self {
        self.inner.hashes = Some(hashes);
        self
    }

    /// Validate and build against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build(self) -> Result<File, ValidationError> {
        self.build_with(registry::global())
    }

    /// Validate and build, dispatching embedded objects through `registry`.
    ///
    /// # Errors
    ///
    /// Returns every defect of the assembled properties.
    pub fn build_with(self, registry: &TypeRegistry) -> Result<File, ValidationError> {
        build_typed(registry, self.inner.to_properties())
    }
}
