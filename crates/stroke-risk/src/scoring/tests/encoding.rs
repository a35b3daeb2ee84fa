use serde_json::json;

use super::common::*;
use crate::scoring::encoder::{encode, EncodeError, FEATURE_COUNT};
use crate::scoring::record::FeatureRecord;

fn record(value: serde_json::Value) -> FeatureRecord {
    serde_json::from_value(value).expect("record decodes")
}

#[test]
fn encodes_high_risk_profile_positionally() {
    let vector = encode(&high_risk_record()).expect("record encodes");

    let mut expected = [0.0; FEATURE_COUNT];
    expected[..10].copy_from_slice(&[67.0, 1.0, 1.0, 1.0, 0.0, 1.0, 228.69, 36.6, 1.0, 2.0]);
    assert_eq!(vector.values(), &expected);
}

#[test]
fn empty_record_uses_documented_defaults() {
    let vector = encode(&FeatureRecord::new()).expect("defaults encode");

    let mut expected = [0.0; FEATURE_COUNT];
    expected[0] = 50.0;
    expected[3] = 1.0;
    expected[5] = 1.0;
    expected[6] = 100.0;
    expected[7] = 25.0;
    assert_eq!(vector.values(), &expected);
}

#[test]
fn null_values_fall_back_to_defaults() {
    let vector = encode(&record(json!({
        "age": null,
        "ever_married": null,
        "hypertension": null
    })))
    .expect("nulls encode");

    assert_eq!(vector.get(0), Some(50.0));
    assert_eq!(vector.get(1), Some(0.0));
    assert_eq!(vector.get(3), Some(1.0));
}

#[test]
fn string_categories_map_through_lookup_tables() {
    let vector = encode(&record(json!({
        "hypertension": true,
        "heart_disease": false,
        "ever_married": "No",
        "work_type": "Govt_job",
        "Residence_type": "Rural",
        "gender": "Other",
        "smoking_status": "formerly smoked"
    })))
    .expect("record encodes");

    assert_eq!(vector.get(1), Some(1.0));
    assert_eq!(vector.get(2), Some(0.0));
    assert_eq!(vector.get(3), Some(0.0));
    assert_eq!(vector.get(4), Some(2.0));
    assert_eq!(vector.get(5), Some(0.0));
    assert_eq!(vector.get(8), Some(2.0));
    assert_eq!(vector.get(9), Some(1.0));
}

#[test]
fn unknown_smoking_label_is_unknown_but_absent_is_never() {
    let unknown = encode(&record(json!({ "smoking_status": "socially" }))).expect("encodes");
    let absent = encode(&FeatureRecord::new()).expect("encodes");

    assert_eq!(unknown.get(9), Some(3.0));
    assert_eq!(absent.get(9), Some(0.0));
}

#[test]
fn flags_use_truthiness() {
    let vector = encode(&record(json!({
        "hypertension": "no",
        "heart_disease": 0
    })))
    .expect("encodes");

    // Any non-empty string is truthy, including "no".
    assert_eq!(vector.get(1), Some(1.0));
    assert_eq!(vector.get(2), Some(0.0));
}

#[test]
fn pre_encoded_values_pass_through() {
    let vector = encode(&record(json!({
        "ever_married": false,
        "work_type": 3,
        "gender": 1,
        "smoking_status": 2,
        "Residence_type": 0
    })))
    .expect("encodes");

    assert_eq!(vector.get(3), Some(0.0));
    assert_eq!(vector.get(4), Some(3.0));
    assert_eq!(vector.get(5), Some(0.0));
    assert_eq!(vector.get(8), Some(1.0));
    assert_eq!(vector.get(9), Some(2.0));
}

#[test]
fn numeric_text_is_parsed() {
    let vector = encode(&record(json!({ "age": " 72 ", "bmi": "31.4" }))).expect("encodes");
    assert_eq!(vector.get(0), Some(72.0));
    assert_eq!(vector.get(7), Some(31.4));
}

#[test]
fn reserved_slots_ignore_caller_input() {
    let vector = encode(&record(json!({ "feature_11": 9.5, "feature_22": 1 }))).expect("encodes");
    assert!(vector.values()[10..].iter().all(|value| *value == 0.0));
}

#[test]
fn rejects_non_numeric_age() {
    let result = encode(&record(json!({ "age": "sixty" })));
    match result {
        Err(EncodeError::InvalidFeature { field, .. }) => assert_eq!(field, "age"),
        other => panic!("expected invalid age, got {other:?}"),
    }
}

#[test]
fn rejects_compound_categories_and_non_finite_numbers() {
    assert!(encode(&record(json!({ "gender": ["male"] }))).is_err());
    assert!(encode(&record(json!({ "bmi": "inf" }))).is_err());
}

#[test]
fn encoding_is_deterministic() {
    let record = low_risk_record();
    let first = encode(&record).expect("encodes");
    let second = encode(&record).expect("encodes");
    assert_eq!(first, second);
    assert!(first.values().iter().all(|value| value.is_finite()));
}
