use std::sync::Arc;

use super::encoder::{FeatureVector, FEATURE_COUNT};
use super::model::{ModelDescriptor, ModelFault, ModelOutput, ScoringModel};

/// Failure surfaced by [`ScoringAdapter::score`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringFailure {
    #[error("no scoring model is configured")]
    Unavailable,
    #[error("{0}")]
    Failed(String),
}

/// Thin wrapper over an injected scoring capability.
///
/// Owns no model lifecycle: whatever loaded the model hands it over here and
/// the adapter only checks shapes on the way in and out.
#[derive(Clone, Default)]
pub struct ScoringAdapter {
    model: Option<Arc<dyn ScoringModel>>,
}

impl ScoringAdapter {
    pub fn new(model: Arc<dyn ScoringModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Adapter with nothing to score against; every call fails as unavailable.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn descriptor(&self) -> Option<ModelDescriptor> {
        self.model.as_ref().map(|model| model.descriptor())
    }

    pub fn score(&self, vector: &FeatureVector) -> Result<ModelOutput, ScoringFailure> {
        let model = self.model.as_ref().ok_or(ScoringFailure::Unavailable)?;

        let descriptor = model.descriptor();
        if descriptor.input_features != FEATURE_COUNT {
            let fault = ModelFault::InputShape {
                expected: FEATURE_COUNT,
                actual: descriptor.input_features,
            };
            return Err(ScoringFailure::Failed(format!(
                "model '{}': {fault}",
                descriptor.name
            )));
        }

        let output = model
            .predict(vector.as_batch())
            .map_err(|fault| ScoringFailure::Failed(fault.to_string()))?;

        if output.is_empty() {
            return Err(ScoringFailure::Failed(format!(
                "model '{}' returned an empty output tensor {}",
                descriptor.name,
                output.shape_label()
            )));
        }

        tracing::debug!(
            model = %descriptor.name,
            shape = %output.shape_label(),
            raw = ?output.first_row(),
            "model scored feature vector"
        );
        Ok(output)
    }
}

impl std::fmt::Debug for ScoringAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringAdapter")
            .field("model", &self.descriptor())
            .finish()
    }
}
