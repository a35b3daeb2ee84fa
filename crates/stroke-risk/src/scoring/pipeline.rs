use axum::http::StatusCode;
use chrono::Utc;

use super::adapter::{ScoringAdapter, ScoringFailure};
use super::encoder::{self, EncodeError, FeatureVector};
use super::interpreter::{self, InterpretError, RiskAssessment};
use super::model::{ModelDescriptor, ModelOutput};
use super::record::{FeatureRecord, PredictRequest};
use super::response::{self, PredictionResponse, ResponseMetadata};

/// Service sequencing encode → score → interpret → build for one record.
///
/// Holds nothing mutable; share it behind an `Arc` across handlers.
#[derive(Debug, Clone)]
pub struct RiskPipeline {
    adapter: ScoringAdapter,
}

impl RiskPipeline {
    pub fn new(adapter: ScoringAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &ScoringAdapter {
        &self.adapter
    }

    pub fn model_descriptor(&self) -> Option<ModelDescriptor> {
        self.adapter.descriptor()
    }

    /// Validate the request envelope and score its record.
    pub fn predict(&self, request: PredictRequest) -> Result<PredictionResponse, PipelineError> {
        if !self.adapter.is_configured() {
            tracing::warn!("prediction requested with no model loaded");
            return Err(PipelineError::ScoringUnavailable);
        }
        let record = request.features.ok_or_else(|| {
            PipelineError::InvalidRecord("request body must contain a \"features\" object".into())
        })?;
        self.predict_record(&record)
    }

    pub fn predict_record(
        &self,
        record: &FeatureRecord,
    ) -> Result<PredictionResponse, PipelineError> {
        let outcome = self.run(record);
        match &outcome {
            Ok(response) => tracing::info!(
                risk_level = %response.risk_level,
                probability = response.probability,
                features = record.len(),
                "prediction completed"
            ),
            Err(err) => tracing::warn!(error = %err, "prediction failed"),
        }
        outcome
    }

    fn run(&self, record: &FeatureRecord) -> Result<PredictionResponse, PipelineError> {
        // Availability wins over payload validation.
        let descriptor = self
            .adapter
            .descriptor()
            .ok_or(PipelineError::ScoringUnavailable)?;

        let vector = self.encode(record)?;
        let output = self.score(&vector)?;
        let assessment = self.interpret(&output)?;

        Ok(response::build(
            &assessment,
            record,
            &output,
            ResponseMetadata {
                model: descriptor.name,
                scored_at: Utc::now(),
            },
        ))
    }

    pub fn encode(&self, record: &FeatureRecord) -> Result<FeatureVector, PipelineError> {
        Ok(encoder::encode(record)?)
    }

    pub fn score(&self, vector: &FeatureVector) -> Result<ModelOutput, PipelineError> {
        Ok(self.adapter.score(vector)?)
    }

    pub fn interpret(&self, output: &ModelOutput) -> Result<RiskAssessment, PipelineError> {
        Ok(interpreter::interpret(output)?)
    }
}

/// Failure of a prediction request as a whole.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("no scoring model is loaded")]
    ScoringUnavailable,
    #[error("scoring failed: {0}")]
    ScoringError(String),
    #[error("unhandled model output width {width}")]
    UnhandledOutputShape { width: usize },
    #[error("model output value at index {index} is not finite")]
    NonFiniteOutput { index: usize },
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
            PipelineError::ScoringUnavailable
            | PipelineError::ScoringError(_)
            | PipelineError::UnhandledOutputShape { .. }
            | PipelineError::NonFiniteOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category reported in the `error` field of failure bodies.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::InvalidRecord(_) => "Invalid request",
            PipelineError::ScoringUnavailable => "Model not loaded",
            PipelineError::ScoringError(_)
            | PipelineError::UnhandledOutputShape { .. }
            | PipelineError::NonFiniteOutput { .. } => "Prediction failed",
        }
    }
}

impl From<EncodeError> for PipelineError {
    fn from(value: EncodeError) -> Self {
        PipelineError::InvalidRecord(value.to_string())
    }
}

impl From<ScoringFailure> for PipelineError {
    fn from(value: ScoringFailure) -> Self {
        match value {
            ScoringFailure::Unavailable => PipelineError::ScoringUnavailable,
            ScoringFailure::Failed(message) => PipelineError::ScoringError(message),
        }
    }
}

impl From<InterpretError> for PipelineError {
    fn from(value: InterpretError) -> Self {
        match value {
            InterpretError::UnhandledOutputShape { width } => {
                PipelineError::UnhandledOutputShape { width }
            }
            InterpretError::NonFiniteOutput { index } => PipelineError::NonFiniteOutput { index },
        }
    }
}
