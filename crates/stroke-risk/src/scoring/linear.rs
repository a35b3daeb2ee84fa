use std::path::Path;

use serde::Deserialize;

use super::encoder::FEATURE_COUNT;
use super::model::{ModelDescriptor, ModelFault, ModelOutput, ScoringModel};

/// Output activation applied to the linear scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Softmax,
}

/// Dense linear model read from a JSON artifact.
///
/// One weight row per output column; a single sigmoid row gives a risk
/// probability, five softmax rows give a risk class distribution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub activation: Activation,
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

impl LinearModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let model: LinearModel = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.weights.is_empty() {
            return Err(ModelLoadError::Invalid("no output rows".to_string()));
        }
        if self.bias.len() != self.weights.len() {
            return Err(ModelLoadError::Invalid(format!(
                "{} bias terms for {} output rows",
                self.bias.len(),
                self.weights.len()
            )));
        }
        if let Some(row) = self.weights.iter().position(|row| row.len() != FEATURE_COUNT) {
            return Err(ModelLoadError::Invalid(format!(
                "weight row {row} has {} entries, expected {FEATURE_COUNT}",
                self.weights[row].len()
            )));
        }
        let all_finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .all(|value| value.is_finite());
        if !all_finite {
            return Err(ModelLoadError::Invalid(
                "weights and bias must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn logits(&self, features: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                row.iter()
                    .zip(features.iter())
                    .fold(*bias, |acc, (weight, value)| acc + weight * value)
            })
            .collect()
    }
}

impl ScoringModel for LinearModel {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            name: self.name.clone(),
            input_features: self.weights.first().map_or(0, Vec::len),
            output_width: self.weights.len(),
        }
    }

    fn predict(&self, batch: &[[f64; FEATURE_COUNT]]) -> Result<ModelOutput, ModelFault> {
        let rows: Vec<Vec<f64>> = batch
            .iter()
            .map(|features| -> Vec<f64> {
                let logits = self.logits(features);
                match self.activation {
                    Activation::Sigmoid => logits.into_iter().map(sigmoid).collect(),
                    Activation::Softmax => softmax(&logits),
                }
            })
            .collect();
        ModelOutput::from_rows(rows)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}
