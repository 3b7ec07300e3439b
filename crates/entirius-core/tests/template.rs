//! Tests for greeting, validation, and processing through the public API.

use entirius_core::{
    greet, greet_value, process, process_value, process_with_clock, validate, validate_value,
    Datum, FixedClock, Input, Kind, ProcessedData, TemplateConfig, TemplateError,
};
use serde_json::json;

fn default_config() -> TemplateConfig {
    TemplateConfig::default()
}

#[test]
fn greeting_uses_default_and_custom_names() {
    assert_eq!(greet(None), "Hello, World! Welcome to Entirius.");
    assert_eq!(greet(Some("Dev")), "Hello, Dev! Welcome to Entirius.");
    assert_eq!(
        greet_value(Some(&Datum::from("Developer"))).expect("greet"),
        "Hello, Developer! Welcome to Entirius."
    );
    assert_eq!(
        greet_value(None).expect("greet"),
        "Hello, World! Welcome to Entirius."
    );
}

#[test]
fn greeting_rejects_non_text_name() {
    let err = greet_value(Some(&Datum::Int(123))).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::InputType {
            found: Kind::Integer,
            ..
        }
    ));
    assert!(err.to_string().contains("Name must be a string"));
}

#[test]
fn validate_accepts_with_default_config() {
    let cfg = default_config();
    assert!(validate("test_value", &cfg));
    assert!(validate("Test123", &cfg));
    assert!(validate("a-b_c", &cfg));
}

#[test]
fn validate_rejects_with_default_config() {
    let cfg = default_config();
    assert!(!validate("", &cfg));
    assert!(!validate(&"a".repeat(101), &cfg));
    assert!(validate(&"a".repeat(100), &cfg));
    assert!(!validate("test@value", &cfg));
    assert!(!validate("test value", &cfg));
}

#[test]
fn validate_with_custom_config() {
    let cfg = TemplateConfig::builder()
        .min_length(3)
        .max_length(10)
        .allowed_chars("[a-z]")
        .build()
        .expect("config");
    assert!(validate("test", &cfg));
    assert!(validate("abcdefghij", &cfg));
    assert!(!validate("ab", &cfg));
    assert!(!validate("abcdefghijk", &cfg));
    assert!(!validate("Test", &cfg));
}

#[test]
fn validate_whitespace_stripping() {
    let strip = TemplateConfig::builder()
        .strip_whitespace(true)
        .build()
        .expect("config");
    assert!(validate("  test  ", &strip));

    let keep = TemplateConfig::builder()
        .strip_whitespace(false)
        .build()
        .expect("config");
    assert!(!validate("  test  ", &keep));
}

#[test]
fn validate_counts_characters_not_bytes() {
    let cfg = TemplateConfig::builder()
        .max_length(3)
        .allowed_chars("[ąęó]")
        .build()
        .expect("config");
    assert!(validate("ąęó", &cfg));
}

#[test]
fn empty_value_fails_class_match_even_with_zero_minimum() {
    let cfg = TemplateConfig::builder()
        .min_length(0)
        .build()
        .expect("config");
    assert!(!validate("", &cfg));
    assert!(!validate("   ", &cfg));
}

#[test]
fn validate_value_rejects_non_text() {
    let err = validate_value(&Datum::Int(123), None).unwrap_err();
    assert!(matches!(err, TemplateError::InputType { .. }));
    assert!(err.to_string().contains("Value must be a string"));
    assert!(validate_value(&Datum::from("ok"), None).expect("validate"));
}

#[test]
fn inverted_bounds_fail_construction() {
    let err = TemplateConfig::new(5, 10, "[a-z]", true).unwrap_err();
    assert!(matches!(err, TemplateError::Config { .. }));
}

#[test]
fn process_text() {
    let result = process_value(Datum::from("test_value"), None).expect("process");
    assert_eq!(result.input_type, Kind::Text);
    assert!(result.valid);
    assert_eq!(result.processed_at, "timestamp_placeholder");
    assert_eq!(
        result.data,
        ProcessedData::Text {
            processed_data: "test_value".to_string(),
            length: 10
        }
    );
}

#[test]
fn process_sequence_counts_valid_items() {
    let result = process(&Input::from(vec!["a", "b", "bad value"]), &default_config());
    assert_eq!(result.input_type, Kind::Sequence);
    assert!(!result.valid);
    let ProcessedData::Sequence {
        processed_data,
        total_items,
        valid_items,
    } = result.data
    else {
        panic!("expected sequence result");
    };
    assert_eq!(total_items, 3);
    assert_eq!(valid_items, 2);
    assert!(processed_data[0].valid);
    assert!(processed_data[1].valid);
    assert!(!processed_data[2].valid);
    assert_eq!(processed_data[2].length, 9);
}

#[test]
fn process_mapping_validates_keys_only() {
    let data = Datum::from(json!({"valid_key": "value1", "invalid@key": [1, 2]}));
    let result = process_value(data, None).expect("process");
    assert_eq!(result.input_type, Kind::Mapping);
    assert!(!result.valid);
    let ProcessedData::Mapping {
        processed_data,
        total_keys,
        valid_keys,
    } = result.data
    else {
        panic!("expected mapping result");
    };
    assert_eq!(total_keys, 2);
    assert_eq!(valid_keys, 1);
    assert!(processed_data["valid_key"].key_valid);
    assert_eq!(processed_data["valid_key"].value_type, Kind::Text);
    assert!(!processed_data["invalid@key"].key_valid);
    assert_eq!(processed_data["invalid@key"].value_type, Kind::Sequence);
    assert_eq!(
        processed_data["invalid@key"].original_value,
        Datum::List(vec![Datum::Int(1), Datum::Int(2)])
    );
}

#[test]
fn mapping_report_follows_input_order() {
    let data = Datum::map([("zeta", 1), ("alpha", 2), ("mid", 3)]);
    let result = process_value(data, None).expect("process");
    let value = serde_json::to_value(&result).expect("serialize");
    let keys: Vec<&str> = value["processed_data"]
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn json_object_order_survives_processing() {
    let value: serde_json::Value =
        serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).expect("json");
    let result = process_value(Datum::from(value), None).expect("process");
    let ProcessedData::Mapping { processed_data, .. } = result.data else {
        panic!("expected mapping result");
    };
    assert_eq!(
        processed_data.keys().collect::<Vec<_>>(),
        vec!["zeta", "alpha", "mid"]
    );
}

#[test]
fn process_rejects_bad_shapes() {
    let err = process_value(Datum::map([(Datum::Int(123), Datum::from("v"))]), None).unwrap_err();
    assert!(matches!(err, TemplateError::KeyType { found: Kind::Integer }));

    let err = process_value(Datum::from(vec![1, 2]), None).unwrap_err();
    assert!(matches!(err, TemplateError::ElementType { index: 0, .. }));

    let err = process_value(Datum::Int(123), None).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::UnsupportedType {
            found: Kind::Integer
        }
    ));
}

#[test]
fn process_reports_custom_config() {
    let cfg = TemplateConfig::builder()
        .max_length(5)
        .min_length(2)
        .build()
        .expect("config");
    let result = process(&Input::from("toolong"), &cfg);
    assert!(!result.valid);
    assert_eq!(result.config_used.max_length, 5);
    assert_eq!(result.config_used.min_length, 2);
}

#[test]
fn process_uses_injected_clock() {
    let clock = FixedClock("2025-06-01T12:00:00Z".to_string());
    let result = process_with_clock(&Input::from("abc"), &default_config(), &clock);
    assert_eq!(result.processed_at, "2025-06-01T12:00:00Z");
}

#[test]
fn process_result_serializes_flat() {
    let result = process(&Input::from(vec!["ok", "no way"]), &default_config());
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        value,
        json!({
            "input_type": "sequence",
            "processed_at": "timestamp_placeholder",
            "config_used": {"max_length": 100, "min_length": 1},
            "valid": false,
            "processed_data": [
                {"value": "ok", "valid": true, "length": 2},
                {"value": "no way", "valid": false, "length": 6}
            ],
            "total_items": 2,
            "valid_items": 1
        })
    );
}

#[test]
fn sequence_reports_agree_with_validate() {
    let cfg = TemplateConfig::builder()
        .max_length(20)
        .min_length(3)
        .build()
        .expect("config");
    let result = process(
        &Input::from(vec!["valid", "too_long_invalid_value", "ok"]),
        &cfg,
    );
    let ProcessedData::Sequence {
        processed_data,
        total_items,
        valid_items,
    } = result.data
    else {
        panic!("expected sequence result");
    };
    assert_eq!(total_items, 3);
    assert_eq!(valid_items, 1);
    for item in processed_data {
        assert_eq!(item.valid, validate(&item.value, &cfg));
    }
}

#[test]
fn every_operation_reports_type_errors_through_one_type() {
    assert_eq!(
        validate_value(&Datum::Int(123), None).unwrap_err(),
        TemplateError::InputType {
            what: "Value",
            found: Kind::Integer
        }
    );
    assert_eq!(
        greet_value(Some(&Datum::Int(123))).unwrap_err(),
        TemplateError::InputType {
            what: "Name",
            found: Kind::Integer
        }
    );
    assert_eq!(
        process_value(Datum::Int(123), None).unwrap_err(),
        TemplateError::UnsupportedType {
            found: Kind::Integer
        }
    );
}
