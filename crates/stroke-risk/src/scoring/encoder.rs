use serde::Serialize;

use super::record::{FeatureRecord, FeatureValue};

/// Width of the model input.
pub const FEATURE_COUNT: usize = 22;

/// Positional names of the model input. Slots 10 onwards are reserved and
/// always encoded as zero.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "hypertension",
    "heart_disease",
    "ever_married",
    "work_type",
    "Residence_type",
    "avg_glucose_level",
    "bmi",
    "gender",
    "smoking_status",
    "feature_11",
    "feature_12",
    "feature_13",
    "feature_14",
    "feature_15",
    "feature_16",
    "feature_17",
    "feature_18",
    "feature_19",
    "feature_20",
    "feature_21",
    "feature_22",
];

const DEFAULT_AGE: f64 = 50.0;
const DEFAULT_GLUCOSE: f64 = 100.0;
const DEFAULT_BMI: f64 = 25.0;
const DEFAULT_EVER_MARRIED: f64 = 1.0;
const DEFAULT_RESIDENCE: f64 = 1.0;

/// Dense model input. Always exactly [`FEATURE_COUNT`] finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Single-row batch of shape `[1, FEATURE_COUNT]`.
    pub fn as_batch(&self) -> &[[f64; FEATURE_COUNT]] {
        std::slice::from_ref(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("feature '{field}' {reason}")]
    InvalidFeature { field: &'static str, reason: String },
}

/// Encode a partial record into the fixed model input.
///
/// Absent (or null) keys take the field default; only values that cannot be
/// coerced to a finite number are rejected.
pub fn encode(record: &FeatureRecord) -> Result<FeatureVector, EncodeError> {
    let mut values = [0.0; FEATURE_COUNT];

    values[0] = numeric(record, "age", DEFAULT_AGE)?;
    values[1] = flag(record, "hypertension");
    values[2] = flag(record, "heart_disease");
    values[3] = categorical(record, "ever_married", DEFAULT_EVER_MARRIED, marital_code)?;
    values[4] = categorical(record, "work_type", 0.0, work_type_code)?;
    values[5] = categorical(record, "Residence_type", DEFAULT_RESIDENCE, residence_code)?;
    values[6] = numeric(record, "avg_glucose_level", DEFAULT_GLUCOSE)?;
    values[7] = numeric(record, "bmi", DEFAULT_BMI)?;
    values[8] = categorical(record, "gender", 0.0, gender_code)?;
    values[9] = categorical(record, "smoking_status", 0.0, smoking_code)?;

    tracing::debug!(features = ?values, "encoded feature vector");
    Ok(FeatureVector(values))
}

pub fn marital_code(value: &str) -> f64 {
    match value.to_lowercase().as_str() {
        "yes" | "married" => 1.0,
        _ => 0.0,
    }
}

pub fn work_type_code(value: &str) -> f64 {
    match value.to_lowercase().as_str() {
        "private" => 0.0,
        "self-employed" => 1.0,
        "govt_job" => 2.0,
        "children" => 3.0,
        "never_worked" => 4.0,
        _ => 0.0,
    }
}

pub fn residence_code(value: &str) -> f64 {
    if value.to_lowercase() == "urban" {
        1.0
    } else {
        0.0
    }
}

pub fn gender_code(value: &str) -> f64 {
    match value.to_lowercase().as_str() {
        "male" => 1.0,
        "female" => 0.0,
        "other" => 2.0,
        _ => 0.0,
    }
}

pub fn smoking_code(value: &str) -> f64 {
    match value.to_lowercase().as_str() {
        "never smoked" | "never" => 0.0,
        "formerly smoked" | "formerly" => 1.0,
        "smokes" | "regularly smoked" | "current" => 2.0,
        _ => 3.0,
    }
}

fn numeric(record: &FeatureRecord, field: &'static str, default: f64) -> Result<f64, EncodeError> {
    let value = match record.present(field) {
        None => return Ok(default),
        Some(FeatureValue::Number(value)) => *value,
        Some(FeatureValue::Bool(flag)) => bool_code(*flag),
        Some(FeatureValue::Text(text)) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| EncodeError::InvalidFeature {
                    field,
                    reason: format!("expected a number, got '{text}'"),
                })?
        }
        Some(other) => {
            return Err(EncodeError::InvalidFeature {
                field,
                reason: format!("expected a number, got {}", other.kind()),
            })
        }
    };
    finite(field, value)
}

fn flag(record: &FeatureRecord, field: &'static str) -> f64 {
    record
        .present(field)
        .map_or(0.0, |value| bool_code(value.is_truthy()))
}

/// Numbers and booleans are taken as already encoded; text goes through `lookup`.
fn categorical(
    record: &FeatureRecord,
    field: &'static str,
    default: f64,
    lookup: fn(&str) -> f64,
) -> Result<f64, EncodeError> {
    let value = match record.present(field) {
        None => return Ok(default),
        Some(FeatureValue::Number(value)) => *value,
        Some(FeatureValue::Bool(flag)) => bool_code(*flag),
        Some(FeatureValue::Text(text)) => lookup(text),
        Some(other) => {
            return Err(EncodeError::InvalidFeature {
                field,
                reason: format!("cannot encode {} as a category", other.kind()),
            })
        }
    };
    finite(field, value)
}

fn finite(field: &'static str, value: f64) -> Result<f64, EncodeError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EncodeError::InvalidFeature {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn bool_code(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
