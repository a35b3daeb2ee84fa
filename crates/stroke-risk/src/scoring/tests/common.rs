use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::scoring::encoder::FEATURE_COUNT;
use crate::scoring::model::{ModelDescriptor, ModelFault, ModelOutput, ScoringModel};
use crate::scoring::record::FeatureRecord;
use crate::scoring::{RiskPipeline, ScoringAdapter};

pub(super) const EPSILON: f64 = 1e-9;

/// Model that ignores its input and replays a fixed output row.
pub(super) struct FixedModel {
    row: Vec<f64>,
    input_features: usize,
    pub(super) calls: AtomicUsize,
}

impl FixedModel {
    pub(super) fn new(row: Vec<f64>) -> Self {
        Self {
            row,
            input_features: FEATURE_COUNT,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn with_input_features(mut self, input_features: usize) -> Self {
        self.input_features = input_features;
        self
    }
}

impl ScoringModel for FixedModel {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: "fixed-test-model".to_string(),
            input_features: self.input_features,
            output_width: self.row.len(),
        }
    }

    fn predict(&self, batch: &[[f64; FEATURE_COUNT]]) -> Result<ModelOutput, ModelFault> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        assert_eq!(batch.len(), 1, "pipeline submits one row per request");
        Ok(ModelOutput::single(self.row.clone()))
    }
}

/// Model whose every call fails.
pub(super) struct BrokenModel;

impl ScoringModel for BrokenModel {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: "broken-test-model".to_string(),
            input_features: FEATURE_COUNT,
            output_width: 1,
        }
    }

    fn predict(&self, _batch: &[[f64; FEATURE_COUNT]]) -> Result<ModelOutput, ModelFault> {
        Err(ModelFault::Internal("tensor allocation failed".to_string()))
    }
}

/// Model that echoes the submitted age back as a probability in [0, 1].
pub(super) struct AgeEchoModel;

impl ScoringModel for AgeEchoModel {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: "age-echo".to_string(),
            input_features: FEATURE_COUNT,
            output_width: 1,
        }
    }

    fn predict(&self, batch: &[[f64; FEATURE_COUNT]]) -> Result<ModelOutput, ModelFault> {
        let rows = batch.iter().map(|row| vec![row[0] / 100.0]).collect();
        ModelOutput::from_rows(rows)
    }
}

pub(super) fn pipeline_with(model: impl ScoringModel + 'static) -> RiskPipeline {
    RiskPipeline::new(ScoringAdapter::new(Arc::new(model)))
}

pub(super) fn unconfigured_pipeline() -> RiskPipeline {
    RiskPipeline::new(ScoringAdapter::unconfigured())
}

/// High-risk patient profile used across scenarios.
pub(super) fn high_risk_record() -> FeatureRecord {
    FeatureRecord::new()
        .with("age", 67)
        .with("hypertension", 1)
        .with("heart_disease", 1)
        .with("ever_married", 1)
        .with("work_type", 0)
        .with("Residence_type", 1)
        .with("avg_glucose_level", 228.69)
        .with("bmi", 36.6)
        .with("gender", "male")
        .with("smoking_status", "smokes")
}

pub(super) fn low_risk_record() -> FeatureRecord {
    FeatureRecord::new()
        .with("age", 30)
        .with("hypertension", 0)
        .with("heart_disease", 0)
        .with("ever_married", 1)
        .with("work_type", 0)
        .with("Residence_type", 1)
        .with("avg_glucose_level", 85)
        .with("bmi", 22.5)
        .with("gender", "female")
        .with("smoking_status", "never smoked")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}
