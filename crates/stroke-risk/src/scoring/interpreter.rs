//! Translates raw model output into a risk category and probability.
//!
//! Two output layouts are understood: a single probability column, and a
//! five-column class distribution ordered from lowest to highest risk. The
//! two produce different category sets; a single probability never maps to
//! `very_low` or `very_high`.

use serde::{Deserialize, Serialize};

use super::model::ModelOutput;

/// Probability at or above which a single-column output is `high`.
pub const HIGH_THRESHOLD: f64 = 0.7;
/// Probability at or above which a single-column output is `moderate`.
pub const MODERATE_THRESHOLD: f64 = 0.4;
/// Anchor the class baseline is pulled toward as confidence drops.
pub const NEUTRAL_ANCHOR: f64 = 0.3;
/// Width of the class-distribution layout.
pub const CLASS_COUNT: usize = 5;

/// Class index → (level, baseline probability).
const CLASS_TABLE: [(RiskLevel, f64); CLASS_COUNT] = [
    (RiskLevel::VeryLow, 0.1),
    (RiskLevel::Low, 0.3),
    (RiskLevel::Moderate, 0.5),
    (RiskLevel::High, 0.7),
    (RiskLevel::VeryHigh, 0.9),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low risk",
            RiskLevel::Low => "Low risk",
            RiskLevel::Moderate => "Moderate risk",
            RiskLevel::High => "High risk",
            RiskLevel::VeryHigh => "Very High risk",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    /// Category for a single-column probability.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if probability >= MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which output layout produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Binary,
    MultiClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub mode: OutputMode,
    /// Mass the model put on its chosen class. Multi-class only.
    pub confidence: Option<f64>,
    /// Index of the chosen class. Multi-class only.
    pub class_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpretError {
    #[error("unhandled model output width {width}; expected 1 or 5")]
    UnhandledOutputShape { width: usize },
    #[error("model output value at index {index} is not finite")]
    NonFiniteOutput { index: usize },
}

pub fn interpret(output: &ModelOutput) -> Result<RiskAssessment, InterpretError> {
    let row = output.first_row();
    if let Some(index) = row.iter().position(|value| !value.is_finite()) {
        return Err(InterpretError::NonFiniteOutput { index });
    }

    match output.cardinality() {
        CLASS_COUNT => Ok(interpret_classes(row)),
        1 => Ok(interpret_probability(row[0])),
        width => Err(InterpretError::UnhandledOutputShape { width }),
    }
}

fn interpret_probability(probability: f64) -> RiskAssessment {
    RiskAssessment {
        probability,
        risk_level: RiskLevel::from_probability(probability),
        mode: OutputMode::Binary,
        confidence: None,
        class_index: None,
    }
}

fn interpret_classes(row: &[f64]) -> RiskAssessment {
    let class_index = argmax(row);
    let (risk_level, baseline) = CLASS_TABLE[class_index];
    let confidence = row[class_index];

    RiskAssessment {
        probability: blend(baseline, confidence),
        risk_level,
        mode: OutputMode::MultiClass,
        confidence: Some(confidence),
        class_index: Some(class_index),
    }
}

/// Weighted blend of the class baseline toward [`NEUTRAL_ANCHOR`]. Not a
/// calibrated transform: a confident model reports its class baseline, an
/// unsure one drifts toward the anchor.
pub fn blend(baseline: f64, confidence: f64) -> f64 {
    baseline * confidence + NEUTRAL_ANCHOR * (1.0 - confidence)
}

/// First index of the maximum value.
fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in row.iter().enumerate().skip(1) {
        if *value > row[best] {
            best = index;
        }
    }
    best
}
