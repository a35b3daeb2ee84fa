use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use stroke_risk::error::AppError;
use stroke_risk::scoring::{LinearModel, ScoringAdapter, ScoringModel};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model: ModelStatus,
}

/// What the health endpoint reports about the model artifact.
#[derive(Debug, Clone)]
pub(crate) struct ModelStatus {
    pub(crate) loaded: bool,
    pub(crate) path: PathBuf,
}

/// Load the artifact for the server. A missing or broken artifact leaves the
/// service up but unable to score.
pub(crate) fn load_server_adapter(path: &Path) -> ScoringAdapter {
    match LinearModel::from_path(path) {
        Ok(model) => {
            let descriptor = model.descriptor();
            info!(
                path = %path.display(),
                model = %descriptor.name,
                input_features = descriptor.input_features,
                output_width = descriptor.output_width,
                "model loaded"
            );
            ScoringAdapter::new(Arc::new(model))
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "model could not be loaded; predictions disabled"
            );
            ScoringAdapter::unconfigured()
        }
    }
}

/// Load the artifact for offline commands, where a missing model is fatal.
pub(crate) fn load_offline_adapter(path: &Path) -> Result<ScoringAdapter, AppError> {
    let model = LinearModel::from_path(path)?;
    Ok(ScoringAdapter::new(Arc::new(model)))
}
