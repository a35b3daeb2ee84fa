use chrono::{DateTime, Utc};
use serde::Serialize;

use super::interpreter::{RiskAssessment, RiskLevel};
use super::model::ModelOutput;
use super::record::FeatureRecord;

/// JSON body returned for a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub risk_display: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub model: String,
    pub features_used: Vec<String>,
    pub prediction_details: PredictionDetails,
    pub scored_at: DateTime<Utc>,
}

/// Raw model output echoed back for debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionDetails {
    pub output_shape: String,
    pub raw_output: Vec<Vec<f64>>,
}

/// Request metadata that is not derived from the record or the model output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetadata {
    pub model: String,
    pub scored_at: DateTime<Utc>,
}

pub fn build(
    assessment: &RiskAssessment,
    record: &FeatureRecord,
    output: &ModelOutput,
    metadata: ResponseMetadata,
) -> PredictionResponse {
    PredictionResponse {
        probability: assessment.probability,
        risk_level: assessment.risk_level,
        risk_display: assessment.risk_level.label(),
        confidence: assessment.confidence,
        model: metadata.model,
        features_used: record.keys().map(str::to_string).collect(),
        prediction_details: PredictionDetails {
            output_shape: output.shape_label(),
            raw_output: output.to_rows(),
        },
        scored_at: metadata.scored_at,
    }
}
