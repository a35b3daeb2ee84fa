//! Record encoding, model scoring, and risk interpretation.
//!
//! A request flows through four stages: [`encode`] turns the caller's record
//! into a fixed-width [`FeatureVector`], the [`ScoringAdapter`] hands it to an
//! injected [`ScoringModel`], [`interpret`] maps the raw output onto a
//! [`RiskLevel`], and [`build`] assembles the response body.
//! [`RiskPipeline`] sequences the stages for the HTTP router and the CLI.

pub mod adapter;
pub mod encoder;
pub mod import;
pub mod interpreter;
pub mod linear;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests;

pub use adapter::{ScoringAdapter, ScoringFailure};
pub use encoder::{encode, EncodeError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use import::{records_from_csv, records_from_path, RecordImportError};
pub use interpreter::{interpret, InterpretError, OutputMode, RiskAssessment, RiskLevel};
pub use linear::{Activation, LinearModel, ModelLoadError};
pub use model::{ModelDescriptor, ModelFault, ModelOutput, ScoringModel};
pub use pipeline::{PipelineError, RiskPipeline};
pub use record::{FeatureRecord, FeatureValue, PredictRequest};
pub use response::{build, PredictionDetails, PredictionResponse, ResponseMetadata};
pub use router::scoring_router;
