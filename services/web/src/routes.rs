use crate::infra::{AppState, WebState};
use crate::pages::{self, offer_filter, signed_in_user, Params, ProfileQuery};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use credium::error::AppError;
use credium::scoring::{rank_offers, ApplicantProfile, RankedOffer, ScoreResult};
use serde::Serialize;
use serde_json::json;

/// Human-readable messages next to the structured estimate.
#[derive(Debug, Serialize)]
pub(crate) struct EstimateMessages {
    pub(crate) band: &'static str,
    pub(crate) explanation: Vec<String>,
    pub(crate) suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EstimateResponse {
    #[serde(flatten)]
    pub(crate) result: ScoreResult,
    pub(crate) messages: EstimateMessages,
}

impl From<ScoreResult> for EstimateResponse {
    fn from(result: ScoreResult) -> Self {
        let messages = EstimateMessages {
            band: result.band.label(),
            explanation: result.explanation_messages(),
            suggestions: result.suggestion_messages(),
        };
        Self { result, messages }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OffersResponse {
    pub(crate) estimate: EstimateResponse,
    pub(crate) offers: Vec<RankedOffer>,
}

pub(crate) fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/catalog", get(pages::catalog))
        .route("/search", get(pages::search))
        .route("/product/:id", get(pages::product))
        .route("/onboarding", get(pages::onboarding))
        .route("/ai-results", get(pages::ai_results))
        .route("/personal-offers", get(pages::personal_offers))
        .route(
            "/api/v1/estimate",
            get(estimate_query_endpoint).post(estimate_endpoint),
        )
        .route("/api/v1/offers", get(offers_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn estimate_endpoint(
    State(state): State<WebState>,
    Json(profile): Json<ApplicantProfile>,
) -> Json<EstimateResponse> {
    Json(state.estimator.estimate(&profile).into())
}

pub(crate) async fn estimate_query_endpoint(
    State(state): State<WebState>,
    Query(profile): Query<ApplicantProfile>,
) -> Json<EstimateResponse> {
    Json(state.estimator.estimate(&profile).into())
}

pub(crate) async fn offers_endpoint(
    State(state): State<WebState>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Result<Json<OffersResponse>, AppError> {
    let query = ProfileQuery::for_offers(&params);
    let filter = offer_filter(&params);

    let products = state.backend.search(&query.search_params()).await?.results;
    let user = signed_in_user(&state, &headers).await;
    let estimate = state
        .estimator
        .estimate(&query.applicant_profile(user.as_ref()));
    let offers = rank_offers(
        &products,
        &estimate,
        state.estimator.policy().recommended_at,
        &filter,
    );

    Ok(Json(OffersResponse {
        estimate: estimate.into(),
        offers,
    }))
}
