//! # Custom Types
//!
//! Types registered at startup go through the same dispatch, validation and
//! serialization paths as the built-ins. These tests use explicit registries
//! so they never touch the process-wide one.

use serde_json::json;
use stix_core::Timestamp;
use stix_model::{
    serialize, serialize_compact, CustomProperty, CustomType, Defect, DefectKind, ObjectClass,
    ObservedData, Parser, PropertyKind, RegistryError, TypeRegistry, TypedValue,
};

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_builtins();
    registry
        .register_custom(CustomType {
            type_name: "x-acme-sensor".into(),
            class: ObjectClass::Observable,
            properties: vec![
                CustomProperty {
                    name: "serial".into(),
                    kind: PropertyKind::String,
                    required: true,
                },
                CustomProperty {
                    name: "seen_at".into(),
                    kind: PropertyKind::Timestamp,
                    required: false,
                },
            ],
            id_contributing: vec!["serial".into()],
        })
        .unwrap();
    registry
        .register_custom(CustomType {
            type_name: "x-acme-campaign".into(),
            class: ObjectClass::Domain,
            properties: vec![
                CustomProperty {
                    name: "title".into(),
                    kind: PropertyKind::String,
                    required: true,
                },
                CustomProperty {
                    name: "sensors".into(),
                    kind: PropertyKind::Objects,
                    required: false,
                },
            ],
            id_contributing: Vec::new(),
        })
        .unwrap();
    registry
}

fn campaign() -> serde_json::Value {
    json!({
        "type": "x-acme-campaign",
        "id": "x-acme-campaign--b67d30ff-02ac-498a-92f9-32f845f448cf",
        "created": "2020-01-01T00:00:00Z",
        "modified": "2020-01-02T00:00:00Z",
        "title": "Winter",
        "sensors": {
            "b": {"type": "x-acme-sensor", "serial": "SN-2"},
            "a": {"type": "x-acme-sensor", "serial": "SN-1", "seen_at": "2020-01-01T12:00:00.5Z"}
        }
    })
}

#[test]
fn custom_domain_object_parses() {
    let registry = registry();
    let object = Parser::new(&registry).parse_value(&campaign()).unwrap();
    assert_eq!(object.type_name(), "x-acme-campaign");
    assert_eq!(object.class(), ObjectClass::Domain);

    let custom = object.as_custom().unwrap();
    assert_eq!(custom.get("title").and_then(TypedValue::as_str), Some("Winter"));
    let Some(TypedValue::Objects(sensors)) = custom.get("sensors") else {
        panic!("sensors not parsed");
    };
    let keys: Vec<&str> = sensors.keys().map(String::as_str).collect();
    assert_eq!(keys, ["b", "a"]);
    assert_eq!(sensors["a"].type_name(), "x-acme-sensor");
}

#[test]
fn custom_object_round_trips() {
    let registry = registry();
    let parser = Parser::new(&registry);
    let object = parser.parse_value(&campaign()).unwrap();
    let text = serialize(&object);
    assert!(text.contains("\"seen_at\": \"2020-01-01T12:00:00Z\""), "{text}");

    let reparsed = parser.parse(&text).unwrap();
    assert_eq!(reparsed, object);
    assert_eq!(serialize_compact(&reparsed), serialize_compact(&object));
}

#[test]
fn custom_rules_are_enforced() {
    let registry = registry();
    let mut value = campaign();
    value["title"] = json!(7);
    value["sensors"]["a"] = json!({"type": "x-acme-sensor"});
    value["sensors"]["c"] = json!({"type": "x-acme-campaign"});
    value["colour"] = json!("blue");

    let err = Parser::new(&registry).parse_value(&value).unwrap_err();
    assert_eq!(
        err.validation().unwrap().kinds(),
        vec![
            DefectKind::InvalidPropertyValue,
            DefectKind::NestedValidationError,
            DefectKind::NestedValidationError,
            DefectKind::UnexpectedProperty,
        ]
    );
}

#[test]
fn custom_observable_gets_deterministic_id() {
    let registry = registry();
    let parser = Parser::new(&registry);
    let a = parser.parse(r#"{"type": "x-acme-sensor", "serial": "SN-1"}"#).unwrap();
    let b = parser
        .parse(r#"{"type": "x-acme-sensor", "serial": "SN-1", "seen_at": "2021-06-01T00:00:00Z"}"#)
        .unwrap();
    let id = registry.deterministic_id(&a).unwrap();
    assert!(id.is_type("x-acme-sensor"));
    assert_eq!(registry.deterministic_id(&b), Some(id));
}

#[test]
fn custom_type_cannot_shadow_builtin() {
    let mut registry = registry();
    let err = registry
        .register_custom(CustomType {
            type_name: "file".into(),
            class: ObjectClass::Observable,
            properties: Vec::new(),
            id_contributing: Vec::new(),
        })
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateType("file".into()));
}

#[test]
fn global_parser_does_not_know_custom_types() {
    let err = stix_model::parse_value(&campaign()).unwrap_err();
    assert!(err.validation().unwrap().contains(DefectKind::UnknownType));
}

#[test]
fn builder_embeds_custom_observable_with_explicit_registry() {
    let registry = registry();
    let sensor = Parser::new(&registry)
        .parse(r#"{"type": "x-acme-sensor", "serial": "SN"}"#)
        .unwrap();
    let builder = || {
        ObservedData::builder()
            .first_observed(Timestamp::parse("2020-01-01T00:00:00Z").unwrap())
            .last_observed(Timestamp::parse("2020-01-01T00:00:00Z").unwrap())
            .number_observed(1)
            .object("0", sensor.clone())
    };

    let built = builder().build_with(&registry).unwrap();
    assert_eq!(built.objects()["0"], sensor);

    let err = builder().build().unwrap_err();
    match err.defects() {
        [Defect::NestedValidationError { error, .. }] => {
            assert!(error.contains(DefectKind::UnknownType));
        }
        other => panic!("expected one nested error, got {other:?}"),
    }
}
