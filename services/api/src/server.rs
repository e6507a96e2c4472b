use crate::cli::ServeArgs;
use crate::infra::{load_graph, AppState, InMemoryEntityStore};
use crate::routes::with_projection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use saskatoon::config::AppConfig;
use saskatoon::error::AppError;
use saskatoon::harvest::{DisplayClock, ProjectionService};
use saskatoon::telemetry;
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
    if let Some(seed) = args.seed.take() {
        config.seed_path = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let graph = load_graph(config.seed_path.as_deref())?;
    let store = Arc::new(InMemoryEntityStore::new(graph));
    let projection_service = Arc::new(ProjectionService::new(
        store,
        DisplayClock::new(config.display.time_zone),
        config.display.default_locale,
    ));

    let app = with_projection_routes(projection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        time_zone = %config.display.time_zone,
        language = %config.display.default_locale,
        "harvest projection service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
