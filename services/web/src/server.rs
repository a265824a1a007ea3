use crate::cli::ServeArgs;
use crate::infra::{build_backend, AppState, WebState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credium::config::AppConfig;
use credium::error::AppError;
use credium::scoring::ScoreEstimator;
use credium::telemetry;
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

    let policy = config.scoring.resolve()?;
    info!(
        preset = config.scoring.preset.label(),
        policy_file = ?config.scoring.policy_file,
        "scoring policy loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = build_backend(&config.backend);
    info!(
        mode = ?config.backend.mode,
        base_url = %config.backend.base_url,
        cache_ttl_secs = config.backend.cache_ttl_secs,
        "catalog backend configured"
    );

    let app = router(WebState::new(backend, ScoreEstimator::new(policy)))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credium web frontend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
