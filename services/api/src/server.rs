use crate::cli::ServeArgs;
use crate::infra::{load_server_adapter, AppState, ModelStatus};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stroke_risk::config::AppConfig;
use stroke_risk::error::AppError;
use stroke_risk::scoring::RiskPipeline;
use stroke_risk::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(model) = args.model.take() {
        config.model.path = model;
    }

    telemetry::init(&config.telemetry)?;

    let adapter = load_server_adapter(&config.model.path);
    let model_loaded = adapter.is_configured();
    let pipeline = Arc::new(RiskPipeline::new(adapter));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model: ModelStatus {
            loaded: model_loaded,
            path: config.model.path.clone(),
        },
    };

    let app = with_service_routes(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(model_loaded, Ordering::Release);

    info!(?config.environment, %addr, model_loaded, "stroke risk service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
