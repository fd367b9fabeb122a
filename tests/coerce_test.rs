use chartopt_core::{
    coerce, coerce_to, coercible, Capability, CoerceOptions, Coerced, CoercionError,
    ConfigurationError, Input, TypeSet, Value, ValueError,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Point {
    x: i64,
    y: i64,
}

coercible!(Point as "Point": dict, json, js_literal);

/// Data points built from `[x, y]` pairs as well as mappings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct DataPoint {
    x: f64,
    y: f64,
}

coercible!(DataPoint as "DataPoint": dict, json, array);

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct DictOnly {
    id: String,
}

coercible!(DictOnly as "DictOnly": dict);

#[derive(Debug, Clone, PartialEq)]
struct Opaque;

coercible!(Opaque as "Opaque");

fn point(x: i64, y: i64) -> Point {
    Point { x, y }
}

fn all_flag_combinations() -> Vec<CoerceOptions> {
    (0..32_u8)
        .map(|bits| CoerceOptions {
            allow_dict: bits & 1 != 0,
            allow_json: bits & 2 != 0,
            allow_none: bits & 4 != 0,
            allow_js_literal: bits & 8 != 0,
            force_iterable: bits & 16 != 0,
        })
        .collect()
}

// === Concrete scenarios ===

#[test]
fn test_mapping_becomes_instance() {
    let result = coerce_to::<Point>(json!({ "x": 1, "y": 2 }), CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::Single(point(1, 2)));
}

#[test]
fn test_json_text_becomes_instance() {
    let text = r#"{"x": 1, "y": 2}"#;
    let result = coerce_to::<Point>(text, CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::Single(point(1, 2)));

    let json_only = CoerceOptions::default().with_allow_js_literal(false);
    let result = coerce_to::<Point>(text, json_only).unwrap();
    assert_eq!(result, Coerced::Single(point(1, 2)));
}

#[test]
fn test_list_of_mappings_fans_out() {
    let result = coerce_to::<Point>(
        json!([{ "x": 1, "y": 2 }, { "x": 3, "y": 4 }]),
        CoerceOptions::iterable(),
    )
    .unwrap();
    assert_eq!(result, Coerced::Many(vec![point(1, 2), point(3, 4)]));
}

#[test]
fn test_integer_is_rejected() {
    let err = coerce_to::<Point>(42_i64, CoerceOptions::default()).unwrap_err();
    assert!(err.is_value());
    let message = err.to_string();
    assert!(message.contains("Point"), "{message}");
    assert!(message.contains("int"), "{message}");
}

#[test]
fn test_empty_type_list_is_a_configuration_error() {
    for input in [
        Input::<Point>::from(json!({ "x": 1, "y": 2 })),
        Input::Empty,
        Input::instance(point(0, 0)),
    ] {
        let err = coerce(input, &TypeSet::new(), CoerceOptions::default(), None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("types cannot be empty"));
    }
}

// === Properties ===

#[test]
fn test_typed_input_is_returned_unchanged_under_any_flags() {
    let types = TypeSet::of::<Point>().and::<DataPoint>();
    for options in all_flag_combinations() {
        let result = coerce(Input::instance(point(5, 6)), &types, options, Some("anchor")).unwrap();
        assert_eq!(result, Coerced::Single(point(5, 6)), "{options:?}");
    }
}

#[test]
fn test_bytes_json_matches_mapping() {
    let from_bytes =
        coerce_to::<Point>(br#"{"x": 7, "y": 8}"#.as_slice(), CoerceOptions::default()).unwrap();
    let from_map = coerce_to::<Point>(json!({ "x": 7, "y": 8 }), CoerceOptions::default()).unwrap();
    assert_eq!(from_bytes, from_map);
}

#[test]
fn test_disallowed_mapping_is_a_value_error() {
    let options = CoerceOptions::default().with_allow_dict(false);
    let err = coerce_to::<Point>(json!({ "x": 1, "y": 2 }), options).unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: dict"));
}

#[test]
fn test_disallowed_json_is_a_value_error() {
    let options = CoerceOptions::default().with_allow_json(false);
    for text in [r#"{"x": 1, "y": 2}"#, r#"[{"x": 1, "y": 2}]"#] {
        let err = coerce_to::<Point>(text, options).unwrap_err();
        assert!(err.is_value());
        assert_eq!(
            err.to_string(),
            "expects a Point, dict, str, or None. Received: str"
        );
    }

    let bytes = br#"{"x": 1, "y": 2}"#.as_slice();
    let err = coerce_to::<Point>(bytes, options).unwrap_err();
    assert!(err.is_value());
}

#[test]
fn test_literal_text_is_still_accepted_without_json() {
    let options = CoerceOptions::default().with_allow_json(false);
    let result = coerce_to::<Point>("{ x: 1, 'y': 2 }", options).unwrap();
    assert_eq!(result, Coerced::Single(point(1, 2)));
}

#[test]
fn test_empty_inputs_follow_allow_none() {
    let allow = CoerceOptions::default();
    let deny = CoerceOptions::default().with_allow_none(false);

    assert_eq!(coerce_to::<Point>(Input::Empty, allow).unwrap(), Coerced::Empty);
    assert_eq!(coerce_to::<Point>("", allow).unwrap(), Coerced::Empty);
    assert_eq!(coerce_to::<Point>(false, allow).unwrap(), Coerced::Empty);

    for input in [Input::<Point>::Empty, Input::from(""), Input::from(false)] {
        let err = coerce_to::<Point>(input, deny).unwrap_err();
        assert!(err.is_value());
        assert_eq!(
            err.to_string(),
            "value is not expected to be empty, but was empty"
        );
    }
}

#[test]
fn test_empty_error_names_the_context() {
    let deny = CoerceOptions::default().with_allow_none(false);
    let err =
        coerce(Input::<Point>::Empty, &TypeSet::of::<Point>(), deny, Some("center")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "center: value is not expected to be empty, but was empty"
    );
}

#[test]
fn test_empty_list_under_force_iterable() {
    let result = coerce_to::<Point>(json!([]), CoerceOptions::iterable()).unwrap();
    assert_eq!(result, Coerced::Many(vec![]));
}

#[test]
fn test_list_without_force_iterable_is_rejected() {
    let err = coerce_to::<Point>(
        json!([{ "x": 1, "y": 2 }, { "x": 3, "y": 4 }]),
        CoerceOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: list"));
}

#[test]
fn test_enforced_null_passes_through() {
    let result = coerce_to::<Point>(Input::EnforcedNull, CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::EnforcedNull);

    let deny = CoerceOptions::default().with_allow_none(false);
    let err = coerce_to::<Point>(Input::EnforcedNull, deny).unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: EnforcedNull"));
}

// === JS literal and JSON paths ===

#[test]
fn test_js_literal_text() {
    let result = coerce_to::<Point>("{ x: 1, /* y */ y: 2, }", CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::Single(point(1, 2)));
}

#[test]
fn test_js_literal_needs_its_flag() {
    let options = CoerceOptions::default().with_allow_js_literal(false);
    let err = coerce_to::<Point>("{ x: 1, y: 2 }", options).unwrap_err();
    assert!(err.is_value());
}

#[test]
fn test_js_literal_flag_is_ignored_without_the_capability() {
    // DataPoint cannot parse literals: the text goes to the JSON step instead of failing
    // with a configuration error.
    let result = coerce_to::<DataPoint>(r#"{"x": 1, "y": 2}"#, CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::Single(DataPoint { x: 1.0, y: 2.0 }));

    let err = coerce_to::<DataPoint>("{ x: 1, y: 2 }", CoerceOptions::default()).unwrap_err();
    assert!(err.is_value());
}

#[test]
fn test_valid_json_of_the_wrong_shape_stays_untyped() {
    let result = coerce_to::<Point>(r#"{"x": "one", "y": 2}"#, CoerceOptions::default()).unwrap();
    match result {
        Coerced::Untyped(value) => {
            assert_eq!(value.get("x"), Some(&Value::from("one")));
        }
        other => panic!("Expected an untyped value, got {other:?}"),
    }
}

#[test]
fn test_json_array_text_fans_out() {
    let text = r#"[{"x": 1, "y": 2}, {"x": 3, "y": 4}]"#;
    let result = coerce_to::<Point>(text, CoerceOptions::iterable()).unwrap();
    assert_eq!(result, Coerced::Many(vec![point(1, 2), point(3, 4)]));
}

#[test]
fn test_deeply_nested_text_is_a_value_error() {
    let text = "[".repeat(20_000);
    let err = coerce_to::<Point>(text.as_str(), CoerceOptions::default()).unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: str"));

    let balanced = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
    let err = coerce_to::<Point>(balanced, CoerceOptions::iterable()).unwrap_err();
    assert!(err.is_value());
}

#[test]
fn test_invalid_utf8_bytes() {
    let err = coerce_to::<Point>(vec![0xff_u8, 0xfe], CoerceOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CoercionError::Value(ValueError::InvalidUtf8 { .. })
    ));
}

#[test]
fn test_malformed_mapping_is_a_value_error() {
    let err = coerce_to::<Point>(json!({ "x": "one" }), CoerceOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CoercionError::Value(ValueError::Malformed {
            type_name: "Point",
            ..
        })
    ));
}

// === Collections ===

#[test]
fn test_array_constructor_reads_positional_pairs() {
    let result = coerce_to::<DataPoint>(
        json!([[0, 1.5], { "x": 1, "y": 2.5 }]),
        CoerceOptions::iterable(),
    )
    .unwrap();
    assert_eq!(
        result,
        Coerced::Many(vec![
            DataPoint { x: 0.0, y: 1.5 },
            DataPoint { x: 1.0, y: 2.5 },
        ])
    );
}

#[test]
fn test_mixed_typed_and_raw_elements() {
    let input = Input::List(vec![
        Input::instance(DataPoint { x: 0.0, y: 0.0 }),
        Input::from(json!({ "x": 1, "y": 1 })),
        Input::from(r#"{"x": 2, "y": 2}"#),
    ]);
    let result = coerce_to::<DataPoint>(input, CoerceOptions::iterable()).unwrap();
    assert_eq!(
        result.into_vec(),
        vec![
            DataPoint { x: 0.0, y: 0.0 },
            DataPoint { x: 1.0, y: 1.0 },
            DataPoint { x: 2.0, y: 2.0 },
        ]
    );
}

#[test]
fn test_bad_element_is_reported_with_its_index() {
    let err = coerce::<Point>(
        Input::from(json!([{ "x": 1, "y": 2 }, 5])),
        &TypeSet::of::<Point>(),
        CoerceOptions::iterable(),
        Some("points"),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "points[1] expects a Point, dict, str, or None. Received: int"
    );
}

#[test]
fn test_empty_element_is_rejected() {
    let err = coerce_to::<Point>(json!([{ "x": 1, "y": 2 }, null]), CoerceOptions::iterable())
        .unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: null"));
}

#[test]
fn test_nested_list_element_is_rejected() {
    let err = coerce_to::<Point>(json!([[{ "x": 1, "y": 2 }]]), CoerceOptions::iterable())
        .unwrap_err();
    assert!(err.is_value());
    assert!(err.to_string().ends_with("Received: list"));
}

// === Configuration errors ===

#[test]
fn test_missing_dict_capability() {
    let err = coerce_to::<Opaque>(json!({ "a": 1 }), CoerceOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        CoercionError::Configuration(ConfigurationError::MissingCapability {
            type_name: "Opaque",
            capability: Capability::Dict,
        })
    ));
    assert_eq!(err.to_string(), "Opaque does not support from_dict");
}

#[test]
fn test_missing_json_capability() {
    let err = coerce_to::<DictOnly>(r#"{"id": "a"}"#, CoerceOptions::default()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "DictOnly does not support from_json");
}

#[test]
fn test_missing_capability_only_matters_when_the_path_is_taken() {
    let result = coerce_to::<Opaque>(Input::instance(Opaque), CoerceOptions::default()).unwrap();
    assert_eq!(result, Coerced::Single(Opaque));

    let err = coerce_to::<Opaque>(3.5_f64, CoerceOptions::default()).unwrap_err();
    assert!(err.is_value());
}

#[test]
fn test_primary_type_must_be_the_requested_type() {
    let types = TypeSet::of::<DataPoint>().and::<Point>();
    let err = coerce(
        Input::<Point>::from(json!({ "x": 1, "y": 2 })),
        &types,
        CoerceOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CoercionError::Configuration(ConfigurationError::PrimaryTypeMismatch {
            declared: "DataPoint",
            requested: "Point",
        })
    ));
}
