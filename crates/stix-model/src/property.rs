//! # Property Schema
//!
//! A [`Schema`] is the ordered list of properties one object type declares,
//! plus the cross-field [`Rule`]s that tie them together. Each
//! [`PropertyDef`] pairs a value kind with optional [`Constraint`]s and
//! checks one raw JSON value into a [`TypedValue`].
//!
//! ## Check Order
//!
//! 1. Kind conversion (string, integer, timestamp, ...). A value of the wrong
//!    shape yields one `InvalidPropertyValue` and skips the constraints.
//! 2. Constraints on the typed value. Every failing constraint is reported.
//!
//! Embedded objects (`Objects` kind) are handed back to the validation
//! engine through [`EmbeddedDispatch`], one entry at a time, so a failure in
//! one entry never hides a failure in another.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stix_core::{Binary, Hashes, PrimitiveError, StixId, Timestamp};

use crate::error::{Defect, ValidationError};
use crate::objects::StixObject;
use crate::value::{ObjectMap, PropertyMap, TypedValue};

/// Whether a type is a domain object (SDO) or a cyber-observable (SCO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    /// Carries `created`/`modified`.
    Domain,
    /// Describes an observed artifact; no creation timestamps.
    Observable,
}

impl ObjectClass {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Observable => "observable",
        }
    }

    /// Properties every type of this class declares.
    pub fn common_properties(&self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["type", "id", "created_by_ref", "created", "modified"],
            Self::Observable => &["type", "id"],
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyKind {
    /// JSON string.
    String,
    /// JSON integer (no fractional part).
    Integer,
    /// RFC 3339 timestamp string.
    Timestamp,
    /// `<type>--<uuid>` string.
    Identifier,
    /// Mapping of key → embedded object.
    Objects,
    /// Mapping of hash algorithm → digest.
    Hashes,
    /// base64 string.
    Binary,
}

/// Extra validator applied after the kind check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Value equals the owning type name (the `type` property).
    FixedValue,
    /// Identifier prefix equals the owning type name.
    MatchesOwnType,
    /// Identifier points at one of these types.
    ReferenceTo(Vec<String>),
    /// String is one of these values.
    OneOf(Vec<String>),
    /// Integer is at least this value.
    Min(i64),
    /// String is an absolute URL.
    Url,
    /// String is a dotted-quad IPv4 address with optional `/prefix`.
    Ipv4,
    /// String or mapping is non-empty.
    NonEmpty,
    /// Embedded objects belong to this class.
    ObjectClass(ObjectClass),
}

impl Constraint {
    fn apply(&self, property: &str, owner: &str, value: &TypedValue) -> Option<Defect> {
        match (self, value) {
            (Self::FixedValue, TypedValue::String(s)) if s != owner => Some(Defect::invalid(
                property,
                format!("\"{owner}\""),
                format!("\"{s}\""),
            )),
            (Self::MatchesOwnType, TypedValue::Identifier(id)) if !id.is_type(owner) => {
                Some(Defect::invalid(
                    property,
                    format!("an identifier of type \"{owner}\""),
                    format!("\"{id}\""),
                ))
            }
            (Self::ReferenceTo(types), TypedValue::Identifier(id))
                if !types.iter().any(|t| id.is_type(t)) =>
            {
                Some(Defect::invalid(
                    property,
                    format!("a reference to {}", types.join(" or ")),
                    format!("\"{id}\""),
                ))
            }
            (Self::OneOf(values), TypedValue::String(s)) if !values.contains(s) => {
                Some(Defect::invalid(
                    property,
                    format!("one of: {}", values.join(", ")),
                    format!("\"{s}\""),
                ))
            }
            (Self::Min(min), TypedValue::Integer(n)) if n < min => Some(Defect::invalid(
                property,
                format!("an integer >= {min}"),
                n.to_string(),
            )),
            (Self::Url, TypedValue::String(s)) if url::Url::parse(s).is_err() => Some(
                Defect::invalid(property, "an absolute URL", format!("\"{s}\"")),
            ),
            (Self::Ipv4, TypedValue::String(s)) if !is_ipv4_value(s) => Some(Defect::invalid(
                property,
                "an IPv4 address with optional /prefix (0-32)",
                format!("\"{s}\""),
            )),
            (Self::NonEmpty, TypedValue::String(s)) if s.is_empty() => {
                Some(Defect::invalid(property, "a non-empty string", "\"\""))
            }
            (Self::NonEmpty, TypedValue::Objects(o)) if o.is_empty() => Some(Defect::invalid(
                property,
                "at least one embedded object",
                "an empty mapping",
            )),
            _ => None,
        }
    }
}

fn is_ipv4_value(s: &str) -> bool {
    let (addr, prefix) = match s.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (s, None),
    };
    let prefix_ok = prefix.map_or(true, |p| {
        !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) && p.parse::<u8>().is_ok_and(|n| n <= 32)
    });
    prefix_ok && addr.parse::<Ipv4Addr>().is_ok()
}

/// Entry point the schema uses to validate embedded objects.
///
/// Implemented by the validation engine; `class` restricts which object
/// classes may be embedded.
pub trait EmbeddedDispatch {
    /// Validate one embedded object through the same dispatch path as a
    /// top-level object.
    fn dispatch(
        &self,
        raw: &Map<String, Value>,
        class: Option<ObjectClass>,
    ) -> Result<StixObject, ValidationError>;
}

/// One declared property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    name: String,
    required: bool,
    kind: PropertyKind,
    constraints: Vec<Constraint>,
}

impl PropertyDef {
    /// A property that must be present.
    pub fn required(name: &str, kind: PropertyKind) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            kind,
            constraints: Vec::new(),
        }
    }

    /// A property that may be absent.
    pub fn optional(name: &str, kind: PropertyKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Add a constraint.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the property must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Value kind.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Extra validators.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Check a raw value against this property's kind and constraints.
    ///
    /// `owner` is the type name of the object holding the property.
    ///
    /// # Errors
    ///
    /// Returns every defect found: one `InvalidPropertyValue` for a kind
    /// mismatch, otherwise one per failing constraint, or one
    /// `NestedValidationError` per failing embedded object.
    pub fn check(
        &self,
        owner: &str,
        raw: &Value,
        dispatch: &dyn EmbeddedDispatch,
    ) -> Result<TypedValue, Vec<Defect>> {
        let value = self.convert(raw, dispatch)?;
        let defects: Vec<Defect> = self
            .constraints
            .iter()
            .filter_map(|c| c.apply(&self.name, owner, &value))
            .collect();
        if defects.is_empty() {
            Ok(value)
        } else {
            Err(defects)
        }
    }

    fn convert(&self, raw: &Value, dispatch: &dyn EmbeddedDispatch) -> Result<TypedValue, Vec<Defect>> {
        let mismatch = |expected: &str| vec![Defect::invalid(&self.name, expected, describe(raw))];
        let primitive = |e: PrimitiveError| vec![primitive_defect(&self.name, e)];

        match self.kind {
            PropertyKind::String => raw
                .as_str()
                .map(TypedValue::from)
                .ok_or_else(|| mismatch("a string")),
            PropertyKind::Integer => raw
                .as_i64()
                .map(TypedValue::Integer)
                .ok_or_else(|| mismatch("an integer")),
            PropertyKind::Timestamp => {
                let s = raw.as_str().ok_or_else(|| mismatch("a timestamp string"))?;
                Timestamp::parse(s).map(TypedValue::Timestamp).map_err(primitive)
            }
            PropertyKind::Identifier => {
                let s = raw.as_str().ok_or_else(|| mismatch("an identifier string"))?;
                StixId::parse(s).map(TypedValue::Identifier).map_err(primitive)
            }
            PropertyKind::Binary => {
                let s = raw.as_str().ok_or_else(|| mismatch("a base64 string"))?;
                Binary::new(s).map(TypedValue::Binary).map_err(primitive)
            }
            PropertyKind::Hashes => {
                let map = raw
                    .as_object()
                    .ok_or_else(|| mismatch("a mapping of hash algorithm to digest"))?;
                self.convert_hashes(map)
            }
            PropertyKind::Objects => {
                let map = raw
                    .as_object()
                    .ok_or_else(|| mismatch("a mapping of embedded objects"))?;
                self.convert_objects(map, dispatch)
            }
        }
    }

    fn convert_hashes(&self, map: &Map<String, Value>) -> Result<TypedValue, Vec<Defect>> {
        let mut entries = Vec::with_capacity(map.len());
        let mut defects = Vec::new();
        for (algorithm, digest) in map {
            let Some(digest) = digest.as_str() else {
                defects.push(Defect::invalid(
                    &self.name,
                    format!("a digest string for {algorithm}"),
                    describe(digest),
                ));
                continue;
            };
            match Hashes::check_entry(algorithm, digest) {
                Ok(_) => entries.push((algorithm.as_str(), digest)),
                Err(e) => defects.push(primitive_defect(&self.name, e)),
            }
        }

        if !defects.is_empty() {
            return Err(defects);
        }
        // Duplicates after name normalization and the empty mapping remain.
        Hashes::new(entries)
            .map(TypedValue::Hashes)
            .map_err(|e| vec![primitive_defect(&self.name, e)])
    }

    fn convert_objects(
        &self,
        map: &Map<String, Value>,
        dispatch: &dyn EmbeddedDispatch,
    ) -> Result<TypedValue, Vec<Defect>> {
        let class = self.constraints.iter().find_map(|c| match c {
            Constraint::ObjectClass(class) => Some(*class),
            _ => None,
        });

        let mut objects = ObjectMap::with_capacity(map.len());
        let mut defects = Vec::new();
        for (key, entry) in map {
            let Some(embedded) = entry.as_object() else {
                defects.push(Defect::invalid(
                    &self.name,
                    "an embedded object",
                    format!("{} at key \"{key}\"", json_kind(entry)),
                ));
                continue;
            };
            match dispatch.dispatch(embedded, class) {
                Ok(object) => {
                    objects.insert(key.clone(), object);
                }
                Err(error) => defects.push(Defect::NestedValidationError {
                    property: self.name.clone(),
                    key: key.clone(),
                    error: Box::new(error),
                }),
            }
        }

        if defects.is_empty() {
            Ok(TypedValue::Objects(objects))
        } else {
            Err(defects)
        }
    }
}

fn primitive_defect(property: &str, err: PrimitiveError) -> Defect {
    match err {
        PrimitiveError::InvalidTimestamp { value, reason } => Defect::invalid(
            property,
            "an RFC 3339 timestamp with a zone designator",
            format!("\"{value}\" ({reason})"),
        ),
        PrimitiveError::InvalidIdentifier { value, reason } => Defect::invalid(
            property,
            "an identifier of the form <type>--<uuid>",
            format!("\"{value}\" ({reason})"),
        ),
        PrimitiveError::InvalidTypeName(name) => Defect::invalid(
            property,
            "3-250 characters of a-z, 0-9 and single hyphens",
            format!("\"{name}\""),
        ),
        PrimitiveError::InvalidBinary { reason } => {
            Defect::invalid(property, "base64 with canonical padding", reason)
        }
        PrimitiveError::InvalidHash {
            algorithm,
            value,
            expected,
        } => Defect::invalid(
            property,
            format!("{algorithm} digest of {expected}"),
            format!("\"{value}\""),
        ),
        PrimitiveError::EmptyHashes => {
            Defect::invalid(property, "at least one hash", "an empty mapping")
        }
    }
}

/// Cross-field rule evaluated after every property is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Exactly one group has all of its properties present.
    ExactlyOneOf(Vec<Vec<String>>),
    /// When `property` is present, `requires` must be present too.
    Requires {
        /// The dependent property.
        property: String,
        /// The property it depends on.
        requires: String,
    },
    /// The `earlier` timestamp is not after the `later` one.
    NotAfter {
        /// Timestamp that must come first.
        earlier: String,
        /// Timestamp that must come second.
        later: String,
    },
}

impl Rule {
    /// [`Rule::ExactlyOneOf`] from string slices.
    pub fn exactly_one_of(groups: &[&[&str]]) -> Self {
        Self::ExactlyOneOf(
            groups
                .iter()
                .map(|g| g.iter().map(|p| p.to_string()).collect())
                .collect(),
        )
    }

    /// [`Rule::Requires`] from string slices.
    pub fn requires(property: &str, requires: &str) -> Self {
        Self::Requires {
            property: property.to_string(),
            requires: requires.to_string(),
        }
    }

    /// [`Rule::NotAfter`] from string slices.
    pub fn not_after(earlier: &str, later: &str) -> Self {
        Self::NotAfter {
            earlier: earlier.to_string(),
            later: later.to_string(),
        }
    }

    /// Evaluate against the raw input (presence) and the checked values
    /// (ordering). Ordering is only compared when both values checked.
    pub(crate) fn evaluate(&self, raw: &Map<String, Value>, props: &PropertyMap) -> Option<Defect> {
        let present = |name: &str| raw.get(name).is_some_and(|v| !v.is_null());
        match self {
            Self::ExactlyOneOf(groups) => {
                let satisfied = groups
                    .iter()
                    .filter(|g| g.iter().all(|p| present(p.as_str())))
                    .count();
                if satisfied == 1 {
                    return None;
                }
                let alternatives: Vec<String> = groups.iter().map(|g| g.join(" + ")).collect();
                let mut properties: Vec<String> = Vec::new();
                for p in groups.iter().flatten() {
                    if !properties.contains(p) {
                        properties.push(p.clone());
                    }
                }
                let found = if satisfied == 0 { "none is" } else { "more than one is" };
                Some(Defect::ConstraintViolation {
                    properties,
                    reason: format!(
                        "exactly one of [{}] must be present, but {found}",
                        alternatives.join("] or [")
                    ),
                })
            }
            Self::Requires { property, requires } => (present(property.as_str()) && !present(requires.as_str()))
                .then(|| Defect::ConstraintViolation {
                    properties: vec![property.clone(), requires.clone()],
                    reason: format!("\"{property}\" requires \"{requires}\""),
                }),
            Self::NotAfter { earlier, later } => {
                let first = props.get(earlier).and_then(TypedValue::as_timestamp)?;
                let second = props.get(later).and_then(TypedValue::as_timestamp)?;
                (first > second).then(|| Defect::ConstraintViolation {
                    properties: vec![earlier.clone(), later.clone()],
                    reason: format!(
                        "\"{earlier}\" ({first}) must not be after \"{later}\" ({second})"
                    ),
                })
            }
        }
    }
}

/// Ordered property declarations and rules for one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: String,
    class: ObjectClass,
    properties: Vec<PropertyDef>,
    rules: Vec<Rule>,
    id_contributing: Vec<String>,
}

impl Schema {
    /// A domain object schema with the common SDO properties and the
    /// `created <= modified` rule.
    pub fn domain(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            class: ObjectClass::Domain,
            properties: vec![
                type_property(),
                PropertyDef::required("id", PropertyKind::Identifier).with(Constraint::MatchesOwnType),
                PropertyDef::optional("created_by_ref", PropertyKind::Identifier)
                    .with(Constraint::ReferenceTo(vec!["identity".to_string()])),
                PropertyDef::required("created", PropertyKind::Timestamp),
                PropertyDef::required("modified", PropertyKind::Timestamp),
            ],
            rules: vec![Rule::not_after("created", "modified")],
            id_contributing: Vec::new(),
        }
    }

    /// An observable schema with `type` and an optional `id`.
    pub fn observable(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            class: ObjectClass::Observable,
            properties: vec![
                type_property(),
                PropertyDef::optional("id", PropertyKind::Identifier).with(Constraint::MatchesOwnType),
            ],
            rules: Vec::new(),
            id_contributing: Vec::new(),
        }
    }

    /// Append a property declaration.
    pub fn with_property(mut self, def: PropertyDef) -> Self {
        self.properties.push(def);
        self
    }

    /// Append a cross-field rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the properties that feed the deterministic identifier.
    pub fn with_id_contributing(mut self, names: &[&str]) -> Self {
        self.id_contributing = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Type name (discriminator value).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Object class.
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// Property declarations in order.
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Look up one property declaration.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Cross-field rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Properties that feed the deterministic identifier.
    pub fn id_contributing(&self) -> &[String] {
        &self.id_contributing
    }
}

fn type_property() -> PropertyDef {
    PropertyDef::required("type", PropertyKind::String).with(Constraint::FixedValue)
}

/// JSON kind of a value, for messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Short rendering of a rejected value.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => json_kind(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefectKind;
    use serde_json::json;

    /// Dispatcher for schemas without embedded objects.
    struct NoEmbedded;

    impl EmbeddedDispatch for NoEmbedded {
        fn dispatch(
            &self,
            _raw: &Map<String, Value>,
            _class: Option<ObjectClass>,
        ) -> Result<StixObject, ValidationError> {
            Err(ValidationError::new(None, vec![Defect::UnknownType("none".into())]))
        }
    }

    fn check(def: &PropertyDef, raw: Value) -> Result<TypedValue, Vec<Defect>> {
        def.check("observed-data", &raw, &NoEmbedded)
    }

    #[test]
    fn string_kind_rejects_numbers() {
        let def = PropertyDef::required("name", PropertyKind::String);
        assert_eq!(check(&def, json!("acme")).unwrap(), TypedValue::from("acme"));
        let defects = check(&def, json!(42)).unwrap_err();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind(), DefectKind::InvalidPropertyValue);
    }

    #[test]
    fn integer_kind_rejects_fractions() {
        let def = PropertyDef::required("number_observed", PropertyKind::Integer).with(Constraint::Min(1));
        assert_eq!(check(&def, json!(50)).unwrap(), TypedValue::Integer(50));
        assert!(check(&def, json!(1.5)).is_err());
        assert!(check(&def, json!("50")).is_err());
    }

    #[test]
    fn min_constraint_rejects_zero_and_negative() {
        let def = PropertyDef::required("number_observed", PropertyKind::Integer).with(Constraint::Min(1));
        for bad in [0, -1] {
            let defects = check(&def, json!(bad)).unwrap_err();
            assert!(matches!(
                &defects[0],
                Defect::InvalidPropertyValue { property, .. } if property == "number_observed"
            ));
        }
    }

    #[test]
    fn fixed_value_compares_owner() {
        let def = type_property();
        assert!(check(&def, json!("observed-data")).is_ok());
        assert!(check(&def, json!("identity")).is_err());
    }

    #[test]
    fn identifier_must_match_owner_type() {
        let def = PropertyDef::required("id", PropertyKind::Identifier).with(Constraint::MatchesOwnType);
        assert!(check(&def, json!("observed-data--b67d30ff-02ac-498a-92f9-32f845f448cf")).is_ok());
        let defects = check(&def, json!("identity--b67d30ff-02ac-498a-92f9-32f845f448cf")).unwrap_err();
        assert!(matches!(&defects[0], Defect::InvalidPropertyValue { expected, .. } if expected.contains("observed-data")));
    }

    #[test]
    fn reference_constraint_checks_target_type() {
        let def = PropertyDef::optional("created_by_ref", PropertyKind::Identifier)
            .with(Constraint::ReferenceTo(vec!["identity".into()]));
        assert!(check(&def, json!("identity--f431f809-377b-45e0-aa1c-6a4751cae5ff")).is_ok());
        assert!(check(&def, json!("file--f431f809-377b-45e0-aa1c-6a4751cae5ff")).is_err());
    }

    #[test]
    fn timestamp_kind_normalizes() {
        let def = PropertyDef::required("created", PropertyKind::Timestamp);
        let value = check(&def, json!("2016-04-06T19:58:16.123Z")).unwrap();
        assert_eq!(value.as_timestamp().unwrap().to_string(), "2016-04-06T19:58:16Z");
        assert!(check(&def, json!("yesterday")).is_err());
    }

    #[test]
    fn hashes_kind_reports_bad_digest() {
        let def = PropertyDef::optional("hashes", PropertyKind::Hashes);
        assert!(check(&def, json!({"MD5": "6826f9a05da08134006557758bb3afbb"})).is_ok());
        let defects = check(&def, json!({"MD5": "a"})).unwrap_err();
        assert!(matches!(&defects[0], Defect::InvalidPropertyValue { expected, .. } if expected.contains("MD5")));
        assert!(check(&def, json!({"MD5": 5})).is_err());
        assert!(check(&def, json!({})).is_err());
    }

    #[test]
    fn hashes_kind_reports_every_bad_entry() {
        let def = PropertyDef::optional("hashes", PropertyKind::Hashes);
        let defects = check(&def, json!({"MD5": "a", "SHA-1": "b", "SHA-256": 7})).unwrap_err();
        assert_eq!(defects.len(), 3);
        assert!(defects.iter().all(|d| d.kind() == DefectKind::InvalidPropertyValue));
        assert!(defects[0].to_string().contains("MD5"));
        assert!(defects[1].to_string().contains("SHA-1"));
        assert!(defects[2].to_string().contains("SHA-256"));
    }

    #[test]
    fn url_and_ipv4_constraints() {
        let url = PropertyDef::optional("url", PropertyKind::String).with(Constraint::Url);
        assert!(check(&url, json!("https://example.com/a.jpg")).is_ok());
        assert!(check(&url, json!("not a url")).is_err());

        let ip = PropertyDef::required("value", PropertyKind::String).with(Constraint::Ipv4);
        assert!(check(&ip, json!("198.51.100.3")).is_ok());
        assert!(check(&ip, json!("198.51.100.0/24")).is_ok());
        assert!(check(&ip, json!("198.51.100.0/33")).is_err());
        assert!(check(&ip, json!("198.51.100")).is_err());
        assert!(check(&ip, json!("198.51.100.0/")).is_err());
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let def = PropertyDef::optional("encryption_algorithm", PropertyKind::String)
            .with(Constraint::OneOf(vec!["AES-256-GCM".into(), "ChaCha20-Poly1305".into()]));
        assert!(check(&def, json!("AES-256-GCM")).is_ok());
        let defects = check(&def, json!("ROT13")).unwrap_err();
        assert!(defects[0].to_string().contains("AES-256-GCM, ChaCha20-Poly1305"));
    }

    #[test]
    fn objects_kind_reports_each_entry() {
        let def = PropertyDef::required("objects", PropertyKind::Objects);
        let defects = check(&def, json!({"0": {"type": "file"}, "1": 7})).unwrap_err();
        assert_eq!(defects.len(), 2);
        assert_eq!(defects[0].kind(), DefectKind::NestedValidationError);
        assert_eq!(defects[1].kind(), DefectKind::InvalidPropertyValue);
    }

    #[test]
    fn exactly_one_of_rule() {
        let rule = Rule::exactly_one_of(&[&["payload_bin"], &["url", "hashes"]]);
        let props = PropertyMap::new();
        let eval = |raw: Value| rule.evaluate(raw.as_object().unwrap(), &props);

        assert!(eval(json!({"payload_bin": "aGk="})).is_none());
        assert!(eval(json!({"url": "u", "hashes": {}})).is_none());
        let neither = eval(json!({"mime_type": "image/jpeg"})).unwrap();
        assert!(neither.to_string().contains("none is"));
        let both = eval(json!({"payload_bin": "aGk=", "url": "u", "hashes": {}})).unwrap();
        assert!(both.to_string().contains("more than one"));
        assert!(eval(json!({"payload_bin": null, "url": "u", "hashes": {}})).is_none());
    }

    #[test]
    fn requires_rule() {
        let rule = Rule::requires("decryption_key", "encryption_algorithm");
        let props = PropertyMap::new();
        assert!(rule.evaluate(json!({"decryption_key": "k"}).as_object().unwrap(), &props).is_some());
        assert!(rule
            .evaluate(json!({"decryption_key": "k", "encryption_algorithm": "AES-256-GCM"}).as_object().unwrap(), &props)
            .is_none());
        assert!(rule.evaluate(json!({}).as_object().unwrap(), &props).is_none());
    }

    #[test]
    fn not_after_rule_compares_checked_timestamps() {
        let rule = Rule::not_after("first_observed", "last_observed");
        let raw = Map::new();
        let mut props = PropertyMap::new();
        props.insert(
            "first_observed".into(),
            TypedValue::Timestamp(Timestamp::parse("2015-12-21T19:00:01Z").unwrap()),
        );
        assert!(rule.evaluate(&raw, &props).is_none());
        props.insert(
            "last_observed".into(),
            TypedValue::Timestamp(Timestamp::parse("2015-12-21T19:00:00Z").unwrap()),
        );
        let defect = rule.evaluate(&raw, &props).unwrap();
        assert_eq!(defect.kind(), DefectKind::ConstraintViolation);
    }

    #[test]
    fn domain_schema_has_common_properties() {
        let schema = Schema::domain("identity");
        let names: Vec<&str> = schema.properties().iter().map(PropertyDef::name).collect();
        assert_eq!(names, ObjectClass::Domain.common_properties());
        assert!(schema.property("created").unwrap().is_required());
        assert!(!schema.property("created_by_ref").unwrap().is_required());
        assert_eq!(schema.rules().len(), 1);

        let sco = Schema::observable("file");
        assert!(!sco.property("id").unwrap().is_required());
        assert!(sco.property("created").is_none());
    }

    #[test]
    fn property_kind_names() {
        let kind: PropertyKind = serde_yaml::from_str("identifier").unwrap();
        assert_eq!(kind, PropertyKind::Identifier);
        let class: ObjectClass = serde_yaml::from_str("observable").unwrap();
        assert_eq!(class, ObjectClass::Observable);
    }
}
