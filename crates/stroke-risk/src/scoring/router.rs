use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::encoder::{FEATURE_COUNT, FEATURE_NAMES};
use super::pipeline::{PipelineError, RiskPipeline};
use super::record::PredictRequest;

/// Router builder exposing the prediction and model description endpoints.
pub fn scoring_router(pipeline: Arc<RiskPipeline>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/model/info", get(model_info_handler))
        .with_state(pipeline)
}

pub(crate) async fn predict_handler(
    State(pipeline): State<Arc<RiskPipeline>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let outcome = match payload {
        Ok(Json(request)) => pipeline.predict(request),
        Err(rejection) if pipeline.adapter().is_configured() => {
            Err(PipelineError::InvalidRecord(rejection.body_text()))
        }
        Err(_) => Err(PipelineError::ScoringUnavailable),
    };

    match outcome {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn model_info_handler(State(pipeline): State<Arc<RiskPipeline>>) -> Response {
    match pipeline.model_descriptor() {
        Some(descriptor) => {
            let payload = json!({
                "model": descriptor.name,
                "input_features": descriptor.input_features,
                "output_width": descriptor.output_width,
                "expected_features": FEATURE_NAMES,
                "feature_count": FEATURE_COUNT,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        None => PipelineError::ScoringUnavailable.into_response(),
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.category(),
            "message": self.to_string(),
        });
        (self.status_code(), Json(payload)).into_response()
    }
}
