use crate::infra::load_offline_adapter;
use clap::{ArgGroup, Args};
use std::fs;
use std::path::{Path, PathBuf};
use stroke_risk::config::AppConfig;
use stroke_risk::error::AppError;
use stroke_risk::scoring::{
    encode, records_from_path, FeatureRecord, PipelineError, RiskPipeline, FEATURE_NAMES,
};
use stroke_risk::telemetry;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["record", "csv"])))]
pub(crate) struct ScoreArgs {
    /// Model artifact to score with (defaults to STROKE_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// JSON file holding a single feature record
    #[arg(long)]
    pub(crate) record: Option<PathBuf>,
    /// CSV export with one feature record per row
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct EncodeArgs {
    /// JSON file holding a single feature record
    #[arg(long)]
    pub(crate) record: PathBuf,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let model_path = args.model.unwrap_or(config.model.path);
    let pipeline = RiskPipeline::new(load_offline_adapter(&model_path)?);

    if let Some(path) = args.record {
        let record = read_record(&path)?;
        let response = pipeline.predict_record(&record)?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let Some(path) = args.csv {
        for (index, record) in records_from_path(&path)?.iter().enumerate() {
            // Rows are numbered from 1, after the header.
            let row = index + 1;
            match pipeline.predict_record(record) {
                Ok(response) => println!("{}", serde_json::to_string(&response)?),
                Err(err) => {
                    let failure = serde_json::json!({
                        "row": row,
                        "error": err.category(),
                        "message": err.to_string(),
                    });
                    println!("{failure}");
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn run_encode(args: EncodeArgs) -> Result<(), AppError> {
    let record = read_record(&args.record)?;
    let vector = encode(&record).map_err(PipelineError::from)?;

    for (name, value) in FEATURE_NAMES.iter().zip(vector.values()) {
        println!("{name:<20} {value}");
    }
    Ok(())
}

fn read_record(path: &Path) -> Result<FeatureRecord, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
