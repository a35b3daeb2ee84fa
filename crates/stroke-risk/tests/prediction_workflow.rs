//! End-to-end scenarios through the public pipeline and router, using the
//! reference linear model artifact shipped under `models/`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use stroke_risk::scoring::{
    encode, records_from_csv, scoring_router, FeatureRecord, LinearModel, OutputMode,
    PipelineError, PredictRequest, RiskLevel, RiskPipeline, ScoringAdapter, ScoringModel,
};

fn artifact_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/stroke_model.json")
}

fn reference_pipeline() -> RiskPipeline {
    let model = LinearModel::from_path(artifact_path()).expect("reference artifact loads");
    RiskPipeline::new(ScoringAdapter::new(Arc::new(model)))
}

fn softmax_pipeline() -> RiskPipeline {
    let mut weights = vec![vec![0.0; 22]; 5];
    // Age pushes mass toward the higher classes.
    for (class, row) in weights.iter_mut().enumerate() {
        row[0] = 0.02 * class as f64;
    }
    let raw = json!({
        "name": "stroke-classes-test",
        "activation": "softmax",
        "weights": weights,
        "bias": [1.0, 0.5, 0.0, -0.5, -1.0],
    })
    .to_string();
    let model = LinearModel::from_json(&raw).expect("softmax artifact loads");
    RiskPipeline::new(ScoringAdapter::new(Arc::new(model)))
}

fn record(value: Value) -> FeatureRecord {
    serde_json::from_value(value).expect("record decodes")
}

#[test]
fn reference_model_describes_itself() {
    let model = LinearModel::from_path(artifact_path()).expect("reference artifact loads");
    let descriptor = model.descriptor();
    assert_eq!(descriptor.name, "stroke-logistic-v1");
    assert_eq!(descriptor.input_features, 22);
    assert_eq!(descriptor.output_width, 1);
}

#[test]
fn high_and_low_risk_profiles_separate() {
    let pipeline = reference_pipeline();

    let high = pipeline
        .predict(PredictRequest::new(record(json!({
            "age": 67, "hypertension": 1, "heart_disease": 1, "ever_married": 1,
            "work_type": 0, "Residence_type": 1, "avg_glucose_level": 228.69,
            "bmi": 36.6, "gender": "male", "smoking_status": "smokes"
        }))))
        .expect("high-risk profile scores");
    let low = pipeline
        .predict(PredictRequest::new(record(json!({
            "age": 30, "hypertension": 0, "heart_disease": 0, "ever_married": 1,
            "work_type": 0, "Residence_type": 1, "avg_glucose_level": 85,
            "bmi": 22.5, "gender": "female", "smoking_status": "never smoked"
        }))))
        .expect("low-risk profile scores");

    assert_eq!(high.risk_level, RiskLevel::High);
    assert_eq!(low.risk_level, RiskLevel::Low);
    assert!(high.probability > low.probability);
    assert_eq!(high.model, "stroke-logistic-v1");
    assert!(high.confidence.is_none());
}

#[test]
fn multi_class_artifact_uses_the_five_level_taxonomy() {
    let pipeline = softmax_pipeline();

    let young = pipeline
        .predict_record(&record(json!({ "age": 5 })))
        .expect("scores");
    let old = pipeline
        .predict_record(&record(json!({ "age": 95 })))
        .expect("scores");

    assert_eq!(young.risk_level, RiskLevel::VeryLow);
    assert_eq!(old.risk_level, RiskLevel::VeryHigh);
    for response in [&young, &old] {
        let confidence = response.confidence.expect("multi-class reports confidence");
        assert!((0.0..=1.0).contains(&confidence));
        assert!((0.0..=1.0).contains(&response.probability));
    }
}

#[test]
fn stages_compose_outside_the_pipeline() {
    let pipeline = reference_pipeline();
    let features = record(json!({ "age": 67, "hypertension": true }));

    let vector = encode(&features).expect("encodes");
    let output = pipeline.score(&vector).expect("scores");
    let assessment = pipeline.interpret(&output).expect("interprets");

    assert_eq!(output.shape(), (1, 1));
    assert_eq!(assessment.mode, OutputMode::Binary);
    assert_eq!(assessment.probability, output.first_row()[0]);
}

#[test]
fn csv_rows_score_independently() {
    let csv = "\
id,gender,age,hypertension,heart_disease,ever_married,work_type,Residence_type,avg_glucose_level,bmi,smoking_status,stroke
9046,Male,67,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked,1
51676,Female,61,0,0,Yes,Self-employed,Rural,202.21,N/A,never smoked,1
31112,Male,80,0,1,Yes,Private,Rural,105.92,32.5,never smoked,1
";
    let records = records_from_csv(csv.as_bytes()).expect("csv parses");
    let pipeline = reference_pipeline();

    let responses: Vec<_> = records
        .iter()
        .map(|record| pipeline.predict_record(record).expect("row scores"))
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].features_used[0], "id");
    assert!(!responses[1].features_used.iter().any(|key| key == "bmi"));
    let vector = encode(&records[1]).expect("missing bmi encodes");
    assert_eq!(vector.get(7), Some(25.0));
    assert_eq!(vector.get(4), Some(1.0));
}

#[test]
fn unconfigured_service_reports_unavailable() {
    let pipeline = RiskPipeline::new(ScoringAdapter::unconfigured());
    let result = pipeline.predict(PredictRequest::new(FeatureRecord::new()));
    assert_eq!(result, Err(PipelineError::ScoringUnavailable));
}

#[tokio::test]
async fn router_serves_predictions_over_http() {
    let router = scoring_router(Arc::new(reference_pipeline()));

    let response = router
        .oneshot(
            Request::post("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "features": { "age": 52, "hypertension": 1 } }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("JSON body");
    assert_eq!(body["model"], "stroke-logistic-v1");
    assert_eq!(body["features_used"], json!(["age", "hypertension"]));
    assert_eq!(body["prediction_details"]["output_shape"], "(1, 1)");
}
