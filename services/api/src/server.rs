use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_protocol_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use protoscore::config::AppConfig;
use protoscore::error::AppError;
use protoscore::protocols::ProtocolScoringService;
use protoscore::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(load_catalog(&config.scoring, None)?);
    let protocols = catalog.len();
    let scoring_service = Arc::new(ProtocolScoringService::new(
        catalog,
        config.scoring.default_weights,
    ));

    let app = with_protocol_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        protocols,
        weights = ?config.scoring.default_weights,
        "protocol scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
