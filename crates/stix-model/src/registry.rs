//! # Type Registry
//!
//! Maps a discriminator string to the [`Schema`] that governs it and the
//! constructor that assembles the typed variant from validated properties.
//!
//! ## Lifecycle
//!
//! A [`TypeRegistry`] is an owned value: registration takes `&mut self`, so
//! it cannot overlap with validation, which only borrows the registry.
//! The process-wide registry behind [`global`] is frozen on first use. A
//! registry with custom types is installed with [`install_global`] before
//! anything parses; afterwards installation fails with
//! [`RegistryError::AlreadyInitialized`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Map;
use stix_core::{validate_type_name, CanonicalBytes, StixId};

use crate::error::{Defect, RegistryError, ValidationError};
use crate::objects::{
    Artifact, CustomObject, DomainName, File, Identity, Ipv4Addr, ObservedData, StixObject, StixType,
};
use crate::property::{Constraint, ObjectClass, PropertyDef, PropertyKind, Schema};
use crate::serialize::value_to_json;
use crate::value::{PropertyMap, TypedValue};

/// Builds the typed variant from properties that passed validation.
pub type Constructor = fn(&Schema, PropertyMap) -> Result<StixObject, ValidationError>;

/// A registered type: its schema and constructor.
#[derive(Clone)]
pub struct TypeEntry {
    schema: Schema,
    constructor: Constructor,
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl TypeEntry {
    /// The governing schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Assemble the typed object.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's error.
    pub fn construct(&self, props: PropertyMap) -> Result<StixObject, ValidationError> {
        (self.constructor)(&self.schema, props)
    }
}

/// Declaration of a custom object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomType {
    /// Discriminator value.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Domain or observable.
    pub class: ObjectClass,
    /// Properties beyond the common ones of the class.
    #[serde(default)]
    pub properties: Vec<CustomProperty>,
    /// Properties that feed the deterministic identifier (observables).
    #[serde(default)]
    pub id_contributing: Vec<String>,
}

/// One property of a custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProperty {
    /// Property name: 3-250 characters of `a-z`, `0-9` and `_`.
    pub name: String,
    /// Value kind.
    pub kind: PropertyKind,
    /// Whether the property must be present.
    #[serde(default)]
    pub required: bool,
}

/// Discriminator → schema + constructor table.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: BTreeMap<String, TypeEntry>,
}

fn construct<T>(_schema: &Schema, props: PropertyMap) -> Result<StixObject, ValidationError>
where
    T: StixType + Into<StixObject>,
{
    T::from_properties(props).map(Into::into)
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert_builtin::<ObservedData>();
        registry.insert_builtin::<Identity>();
        registry.insert_builtin::<Artifact>();
        registry.insert_builtin::<File>();
        registry.insert_builtin::<Ipv4Addr>();
        registry.insert_builtin::<DomainName>();
        registry
    }

    fn insert_builtin<T: StixType + Into<StixObject>>(&mut self) {
        let schema = T::schema();
        self.entries.insert(
            schema.type_name().to_string(),
            TypeEntry {
                schema,
                constructor: construct::<T>,
            },
        );
    }

    /// Register a schema with its constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTypeName`] for a malformed type name
    /// and [`RegistryError::DuplicateType`] if the name is taken.
    pub fn register(&mut self, schema: Schema, constructor: Constructor) -> Result<(), RegistryError> {
        let name = schema.type_name().to_string();
        validate_type_name(&name).map_err(|_| RegistryError::InvalidTypeName(name.clone()))?;
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        tracing::debug!(type_name = %name, class = %schema.class(), "registered type");
        self.entries.insert(name, TypeEntry { schema, constructor });
        Ok(())
    }

    /// Register a custom type. Its objects are carried as
    /// [`StixObject::Custom`].
    ///
    /// # Errors
    ///
    /// Rejects malformed or taken type names, malformed or duplicated
    /// property names, properties that redefine the common properties of
    /// the class, and ID-contributing properties that are not declared.
    pub fn register_custom(&mut self, decl: CustomType) -> Result<(), RegistryError> {
        let type_name = decl.type_name.as_str();
        let mut schema = match decl.class {
            ObjectClass::Domain => Schema::domain(type_name),
            ObjectClass::Observable => Schema::observable(type_name),
        };

        for prop in &decl.properties {
            let invalid = || RegistryError::InvalidPropertyName {
                type_name: type_name.to_string(),
                property: prop.name.clone(),
            };
            if !is_property_name(&prop.name) {
                return Err(invalid());
            }
            if decl.class.common_properties().contains(&prop.name.as_str()) {
                return Err(RegistryError::ReservedProperty {
                    type_name: type_name.to_string(),
                    property: prop.name.clone(),
                });
            }
            if schema.property(&prop.name).is_some() {
                return Err(invalid());
            }

            let def = if prop.required {
                PropertyDef::required(&prop.name, prop.kind)
            } else {
                PropertyDef::optional(&prop.name, prop.kind)
            };
            let def = match prop.kind {
                PropertyKind::Objects => def.with(Constraint::ObjectClass(ObjectClass::Observable)),
                _ => def,
            };
            schema = schema.with_property(def);
        }

        if let Some(undeclared) = decl
            .id_contributing
            .iter()
            .find(|name| schema.property(name).is_none())
        {
            return Err(RegistryError::UndeclaredIdProperty {
                type_name: type_name.to_string(),
                property: undeclared.clone(),
            });
        }
        let contributing: Vec<&str> = decl.id_contributing.iter().map(String::as_str).collect();
        schema = schema.with_id_contributing(&contributing);

        self.register(schema, CustomObject::construct)
    }

    /// Look up a type.
    ///
    /// # Errors
    ///
    /// Returns [`Defect::UnknownType`] when the type is not registered.
    pub fn lookup(&self, type_name: &str) -> Result<&TypeEntry, Defect> {
        self.entries
            .get(type_name)
            .ok_or_else(|| Defect::UnknownType(type_name.to_string()))
    }

    /// Whether a type is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Registered entries, sorted by type name.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic identifier of an observable.
    ///
    /// UUIDv5 in the SCO namespace over the JCS form of the type's
    /// ID-contributing properties. `hashes` contributes only its preferred
    /// entry. Returns `None` for domain objects, unregistered types, and
    /// observables with no contributing property set.
    pub fn deterministic_id(&self, object: &StixObject) -> Option<StixId> {
        let schema = self.entries.get(object.type_name())?.schema();
        if schema.class() != ObjectClass::Observable {
            return None;
        }

        let props = object.to_properties();
        let mut contributing = Map::new();
        for name in schema.id_contributing() {
            let Some(value) = props.get(name) else {
                continue;
            };
            let json = match value {
                TypedValue::Hashes(hashes) => {
                    let (algorithm, digest) = hashes.preferred()?;
                    let mut one = Map::new();
                    one.insert(algorithm.to_string(), digest.into());
                    one.into()
                }
                other => value_to_json(other),
            };
            contributing.insert(name.clone(), json);
        }
        if contributing.is_empty() {
            return None;
        }

        let canonical = CanonicalBytes::new(&contributing).ok()?;
        StixId::deterministic(schema.type_name(), canonical.as_bytes()).ok()
    }
}

fn is_property_name(name: &str) -> bool {
    (3..=250).contains(&name.len())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// The process-wide registry. Holds the built-in types unless another
/// registry was installed first.
pub fn global() -> &'static TypeRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let registry = TypeRegistry::with_builtins();
        tracing::debug!(types = registry.len(), "initialized built-in type registry");
        registry
    })
}

/// Install `registry` as the process-wide registry.
///
/// Call once at startup, before any parse or validation that uses the
/// global registry.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyInitialized`] if the global registry was
/// already installed or used.
pub fn install_global(registry: TypeRegistry) -> Result<(), RegistryError> {
    let types = registry.len();
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    tracing::debug!(types, "installed global type registry");
    Ok(())
}

/// [`TypeRegistry::deterministic_id`] against the global registry.
pub fn deterministic_id(object: &StixObject) -> Option<StixId> {
    global().deterministic_id(object)
}
