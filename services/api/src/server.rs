use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadRepository, LoggingNotifier};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_match::config::AppConfig;
use loan_match::error::AppError;
use loan_match::intake::WaitlistService;
use loan_match::matching::{load_catalog, MatchingEngine};
use loan_match::telemetry;
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
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(&config.catalog)?;
    let engine = Arc::new(MatchingEngine::new(catalog));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryLeadRepository::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let waitlist = Arc::new(WaitlistService::new(repository, notifier));

    let app = with_service_routes(engine, waitlist)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "student loan matcher ready");

    axum::serve(listener, app).await?;
    Ok(())
}
