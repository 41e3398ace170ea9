//! # Object Fixtures
//!
//! End-to-end checks through the public entry points: parse producer JSON,
//! inspect the typed result, and re-serialize to the canonical form.

use proptest::prelude::*;
use serde_json::{json, Value};
use stix_model::{
    parse, parse_value, serialize, serialize_compact, Defect, DefectKind, File, ObservedData,
    ParseError, StixObject, ValidationError,
};
use stix_core::{StixId, Timestamp};

const FIXTURE: &str = r#"{"type":"observed-data","id":"observed-data--b67d30ff-02ac-498a-92f9-32f845f448cf","created":"2016-04-06T19:58:16Z","created_by_ref":"identity--f431f809-377b-45e0-aa1c-6a4751cae5ff","first_observed":"2015-12-21T19:00:00Z","last_observed":"2015-12-21T19:00:00Z","modified":"2016-04-06T19:58:16Z","number_observed":50,"objects":{"0":{"type":"file"}}}"#;

const EXPECTED: &str = r#"{
  "created": "2016-04-06T19:58:16Z",
  "created_by_ref": "identity--f431f809-377b-45e0-aa1c-6a4751cae5ff",
  "first_observed": "2015-12-21T19:00:00Z",
  "id": "observed-data--b67d30ff-02ac-498a-92f9-32f845f448cf",
  "last_observed": "2015-12-21T19:00:00Z",
  "modified": "2016-04-06T19:58:16Z",
  "number_observed": 50,
  "objects": {
    "0": {
      "type": "file"
    }
  },
  "type": "observed-data"
}"#;

fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

/// The fixture with `objects` replaced by a single embedded artifact.
fn with_artifact(artifact: Value) -> Value {
    let mut value = fixture_value();
    value["objects"] = json!({"0": artifact});
    value
}

/// The defects reported for the embedded object at `objects["0"]`.
fn artifact_defects(artifact: Value) -> Vec<Defect> {
    let err = parse_value(&with_artifact(artifact)).unwrap_err();
    let outer = err.validation().expect("validation failure");
    match &outer.defects()[..] {
        [Defect::NestedValidationError { property, key, error }] => {
            assert_eq!(property, "objects");
            assert_eq!(key, "0");
            error.defects().to_vec()
        }
        other => panic!("expected one nested error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Canonical fixture
// ---------------------------------------------------------------------------

#[test]
fn fixture_parses_to_observed_data() {
    let object = parse(FIXTURE).unwrap();
    assert_eq!(object.type_name(), "observed-data");

    let od = object.as_observed_data().unwrap();
    assert_eq!(od.created(), &Timestamp::parse("2016-04-06T19:58:16Z").unwrap());
    assert_eq!(od.number_observed(), 50);
    assert_eq!(od.objects()["0"].type_name(), "file");
    assert_eq!(
        od.created_by_ref().map(ToString::to_string).as_deref(),
        Some("identity--f431f809-377b-45e0-aa1c-6a4751cae5ff")
    );
}

#[test]
fn fixture_reserializes_with_sorted_keys() {
    let object = parse(FIXTURE).unwrap();
    assert_eq!(serialize(&object), EXPECTED);
}

#[test]
fn reserializing_is_byte_identical() {
    let first = serialize(&parse(FIXTURE).unwrap());
    let second = serialize(&parse(&first).unwrap());
    assert_eq!(first, second);

    let compact = serialize_compact(&parse(&first).unwrap());
    assert_eq!(serialize_compact(&parse(&compact).unwrap()), compact);
}

#[test]
fn fractional_seconds_truncate_on_round_trip() {
    let mut value = fixture_value();
    value["created"] = json!("2016-04-06T19:58:16.123Z");
    value["modified"] = json!("2016-04-06T19:58:16.999Z");
    let object = parse_value(&value).unwrap();
    assert_eq!(serialize(&object), EXPECTED);
    assert_eq!(parse(&serialize(&object)).unwrap(), object);
}

#[test]
fn objects_keep_given_order() {
    let mut value = fixture_value();
    value["objects"] = json!({
        "2": {"type": "domain-name", "value": "example.com"},
        "0": {"type": "file", "name": "foo.exe"},
        "1": {"type": "ipv4-addr", "value": "198.51.100.3"}
    });
    let object = parse_value(&value).unwrap();
    let keys: Vec<&str> = object.as_observed_data().unwrap().objects().keys().map(String::as_str).collect();
    assert_eq!(keys, ["2", "0", "1"]);

    let text = serialize_compact(&object);
    let two = text.find("\"2\"").unwrap();
    let zero = text.find("\"0\"").unwrap();
    let one = text.find("\"1\"").unwrap();
    assert!(two < zero && zero < one, "{text}");
}

// ---------------------------------------------------------------------------
// Artifact rules
// ---------------------------------------------------------------------------

#[test]
fn artifact_with_payload_only_is_valid() {
    let object = parse_value(&with_artifact(json!({
        "type": "artifact",
        "payload_bin": "VBORw0KGgoAAAANSUhEUgAAADI=="
    })))
    .unwrap();
    let artifact = object.as_observed_data().unwrap().objects()["0"].as_artifact().unwrap();
    assert_eq!(artifact.payload_bin().unwrap().as_str(), "VBORw0KGgoAAAANSUhEUgAAADI==");
}

#[test]
fn artifact_with_bad_base64_rejected() {
    let defects = artifact_defects(json!({
        "type": "artifact",
        "payload_bin": "abcVBORw0KGgoAAAANSUhEUgAAADI=="
    }));
    assert!(matches!(
        &defects[..],
        [Defect::InvalidPropertyValue { property, .. }] if property == "payload_bin"
    ));
}

#[test]
fn artifact_with_payload_and_url_rejected() {
    let defects = artifact_defects(json!({
        "type": "artifact",
        "payload_bin": "VBORw0KGgoAAAANSUhEUgAAADI==",
        "url": "https://example.com/foo.png",
        "hashes": {"MD5": "6826f9a05da08134006557758bb3afbb"}
    }));
    assert_eq!(defects.len(), 1);
    assert_eq!(defects[0].kind(), DefectKind::ConstraintViolation);
}

#[test]
fn artifact_with_neither_rejected() {
    let defects = artifact_defects(json!({"type": "artifact", "mime_type": "image/png"}));
    assert_eq!(defects.len(), 1);
    assert_eq!(defects[0].kind(), DefectKind::ConstraintViolation);
}

#[test]
fn artifact_url_with_hashes_is_valid() {
    let object = parse_value(&with_artifact(json!({
        "type": "artifact",
        "url": "https://example.com/foo.png",
        "hashes": {"MD5": "6826f9a05da08134006557758bb3afbb"}
    })))
    .unwrap();
    let artifact = object.as_observed_data().unwrap().objects()["0"].as_artifact().unwrap();
    assert_eq!(artifact.hashes().unwrap().get("MD5"), Some("6826f9a05da08134006557758bb3afbb"));
}

#[test]
fn artifact_short_digest_rejected() {
    let defects = artifact_defects(json!({
        "type": "artifact",
        "url": "https://example.com/foo.png",
        "hashes": {"MD5": "a"}
    }));
    assert!(matches!(
        &defects[..],
        [Defect::InvalidPropertyValue { property, .. }] if property == "hashes"
    ));
}

// ---------------------------------------------------------------------------
// Aggregated failures
// ---------------------------------------------------------------------------

#[test]
fn every_bad_digest_is_reported() {
    let defects = artifact_defects(json!({"type": "file", "hashes": {"MD5": "a", "SHA-1": "b"}}));
    assert_eq!(defects.len(), 2, "{defects:?}");
    assert!(defects
        .iter()
        .all(|d| matches!(d, Defect::InvalidPropertyValue { property, .. } if property == "hashes")));
    assert!(defects[0].to_string().contains("MD5"));
    assert!(defects[1].to_string().contains("SHA-1"));
}

#[test]
fn number_observed_must_be_positive() {
    for bad in [json!(0), json!(-1), json!(2.5), json!("50")] {
        let mut value = fixture_value();
        value["number_observed"] = bad.clone();
        let err = parse_value(&value).unwrap_err();
        let defects = err.validation().unwrap().defects();
        assert!(
            matches!(&defects[..], [Defect::InvalidPropertyValue { property, .. }] if property == "number_observed"),
            "{bad}: {defects:?}"
        );
    }
}

#[test]
fn every_defect_is_reported() {
    let value = json!({
        "type": "observed-data",
        "id": "identity--b67d30ff-02ac-498a-92f9-32f845f448cf",
        "created": "2016-04-06T19:58:16Z",
        "modified": "2016-04-06T19:58:16Z",
        "first_observed": "2015-12-22T19:00:00Z",
        "last_observed": "2015-12-21T19:00:00Z",
        "number_observed": 0,
        "objects": {
            "0": {"type": "file", "size": -5},
            "1": {"type": "artifact"}
        },
        "x_colour": "red"
    });
    let err = parse_value(&value).unwrap_err();
    let ParseError::Invalid(error) = err else {
        panic!("expected a validation failure");
    };
    assert_eq!(error.type_name(), Some("observed-data"));
    assert_eq!(
        error.kinds(),
        vec![
            DefectKind::InvalidPropertyValue,
            DefectKind::InvalidPropertyValue,
            DefectKind::NestedValidationError,
            DefectKind::NestedValidationError,
            DefectKind::UnexpectedProperty,
            DefectKind::ConstraintViolation,
        ]
    );

    let report = error.to_string();
    assert!(report.contains("x_colour"), "{report}");
    assert!(report.contains("\"1\""), "{report}");
}

#[test]
fn nested_error_names_embedded_type() {
    let mut value = fixture_value();
    value["objects"] = json!({"7": {"type": "file", "name": 12}});
    let err = parse_value(&value).unwrap_err();
    let Defect::NestedValidationError { key, error, .. } = &err.validation().unwrap().defects()[0] else {
        panic!("expected nested error");
    };
    assert_eq!(key, "7");
    assert_eq!(error.type_name(), Some("file"));
}

#[test]
fn non_object_entries_rejected() {
    let mut value = fixture_value();
    value["objects"] = json!({"0": "file"});
    let err = parse_value(&value).unwrap_err();
    assert_eq!(err.validation().unwrap().kinds(), vec![DefectKind::InvalidPropertyValue]);
}

// ---------------------------------------------------------------------------
// Builders and the parser agree
// ---------------------------------------------------------------------------

#[test]
fn builder_output_matches_parsed_fixture() {
    let built: StixObject = ObservedData::builder()
        .id(StixId::parse("observed-data--b67d30ff-02ac-498a-92f9-32f845f448cf").unwrap())
        .created(Timestamp::parse("2016-04-06T19:58:16Z").unwrap())
        .created_by_ref(StixId::parse("identity--f431f809-377b-45e0-aa1c-6a4751cae5ff").unwrap())
        .first_observed(Timestamp::parse("2015-12-21T19:00:00Z").unwrap())
        .last_observed(Timestamp::parse("2015-12-21T19:00:00Z").unwrap())
        .number_observed(50)
        .object("0", File::builder().build().unwrap())
        .build()
        .unwrap()
        .into();
    assert_eq!(built, parse(FIXTURE).unwrap());
    assert_eq!(serialize(&built), EXPECTED);
}

#[test]
fn builder_rejects_what_parser_rejects() {
    let err: ValidationError = ObservedData::builder()
        .first_observed(Timestamp::parse("2015-12-21T19:00:00Z").unwrap())
        .last_observed(Timestamp::parse("2015-12-21T19:00:00Z").unwrap())
        .number_observed(0)
        .object("0", File::builder().build().unwrap())
        .build()
        .unwrap_err();
    assert_eq!(err.kinds(), vec![DefectKind::InvalidPropertyValue]);
}

// ---------------------------------------------------------------------------
// Round-trip property
// ---------------------------------------------------------------------------

fn file_strategy() -> impl Strategy<Value = Value> {
    ("[a-z]{1,12}\\.(exe|txt|png)", proptest::option::of(0i64..1_000_000)).prop_map(|(name, size)| {
        let mut file = json!({"type": "file", "name": name});
        if let Some(size) = size {
            file["size"] = json!(size);
        }
        file
    })
}

proptest! {
    #[test]
    fn valid_records_round_trip(
        files in proptest::collection::vec(file_strategy(), 1..5),
        count in 1i64..10_000,
        offset in 0u32..3_600,
    ) {
        let last = format!("2015-12-21T19:{:02}:{:02}Z", offset / 60, offset % 60);
        let mut value = fixture_value();
        value["number_observed"] = json!(count);
        value["last_observed"] = json!(last);
        value["objects"] = files
            .into_iter()
            .enumerate()
            .map(|(i, f)| (i.to_string(), f))
            .collect::<serde_json::Map<String, Value>>()
            .into();

        let object = parse_value(&value).unwrap();
        let text = serialize(&object);
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(&reparsed, &object);
        prop_assert_eq!(serialize(&reparsed), text);
    }
}
