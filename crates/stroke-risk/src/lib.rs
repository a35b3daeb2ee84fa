//! Stroke risk scoring: turns a loosely-typed clinical feature record into a
//! fixed-width model input, scores it through an injected model, and maps the
//! raw output onto a risk category.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
