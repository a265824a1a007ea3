use axum::http::{header, HeaderMap};
use credium::backend::{CachedBackend, CatalogBackend, FixtureBackend, HttpBackend};
use credium::config::{BackendConfig, BackendMode};
use credium::scoring::ScoreEstimator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Cookie carrying the backend session token.
pub(crate) const SESSION_COOKIE: &str = "access_token";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared handles for page and API handlers.
#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) backend: Arc<dyn CatalogBackend>,
    pub(crate) estimator: Arc<ScoreEstimator>,
}

impl WebState {
    pub(crate) fn new(backend: Arc<dyn CatalogBackend>, estimator: ScoreEstimator) -> Self {
        Self {
            backend,
            estimator: Arc::new(estimator),
        }
    }
}

pub(crate) fn build_backend(config: &BackendConfig) -> Arc<dyn CatalogBackend> {
    match config.mode {
        BackendMode::Http => Arc::new(CachedBackend::new(
            HttpBackend::from_config(config),
            Duration::from_secs(config.cache_ttl_secs),
        )),
        BackendMode::Fixture => Arc::new(FixtureBackend::default()),
    }
}

/// Session token from the `access_token` cookie, if any.
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Lenient form number: missing or unparseable values fall back to `default`,
/// negatives clamp to zero.
pub(crate) fn form_number(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|value| value.trim().replace([' ', '\u{a0}'], "").parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map_or(default, |value| value.max(0.0))
}
