use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryEvaluationRepository, LoggingResultPublisher};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillgate::config::AppConfig;
use skillgate::error::AppError;
use skillgate::scoring::{EvaluationService, ScoringPolicy};
use skillgate::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(&config)?;
    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let publisher = Arc::new(LoggingResultPublisher);
    let evaluation_service = Arc::new(EvaluationService::new(
        catalog,
        ScoringPolicy::default(),
        repository,
        publisher,
    ));

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "challenge evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
