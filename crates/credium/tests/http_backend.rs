use std::time::Duration;

use axum::{
    extract::{Path, RawQuery},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use credium::backend::{BackendError, CatalogBackend, HttpBackend};
use credium::catalog::{ProductType, ProfilePatch, SearchParams};
use serde_json::{json, Value};

const TOKEN: &str = "session-123";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

async fn product(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "loan_1" => Ok(Json(json!({
            "id": "loan_1",
            "title": "Personal Loan Z",
            "type": "loan",
            "apr": 11.9,
            "ai_score": 64,
            "bank": "Sberbank",
            "max_amount": 3000000,
            "min_amount": 100000
        }))),
        "broken" => Ok(Json(json!({ "id": 5, "type": "loan" }))),
        id if id.contains('/') => Ok(Json(json!({ "id": id, "type": "card" }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn search(Json(body): Json<Value>) -> Json<Value> {
    let requested_type = body["type"].as_str().unwrap_or("any").to_string();
    let carries_payments = body.get("totalMonthlyPayments").is_some();
    Json(json!({
        "results": [{ "id": "card_1", "type": "card", "apr": null, "features": null }],
        "aiSummary": {
            "score": 77,
            "explanation": [requested_type, carries_payments.to_string()],
            "suggestions": null
        }
    }))
}

async fn check_approval(
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, StatusCode> {
    if id != "loan_1" || query.as_deref() != Some("user_id=u-1") {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "chance": 64,
        "factors": [{ "name": "Уровень дохода", "weight": 35 }],
        "suggestions": ["Добавьте созаёмщика"]
    })))
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "id": "u-1",
        "email": "anna@example.com",
        "full_name": "Анна",
        "monthly_income": 90000,
        "credit_score": 68
    })))
}

async fn update_me(headers: HeaderMap, Json(patch): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "id": "u-1",
        "email": "anna@example.com",
        "monthly_income": patch["monthly_income"],
        "monthly_expenses": patch["monthly_expenses"],
        "total_monthly_payments": patch["total_monthly_payments"]
    })))
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route(
            "/api/products",
            get(|| async { Json(json!([{ "id": "loan_1", "type": "loan" }])) }),
        )
        .route(
            "/api/top10",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route("/api/product/:id", get(product))
        .route("/api/search", axum::routing::post(search))
        .route("/api/products/:id/check-approval", get(check_approval))
        .route("/api/users/me", get(me).patch(update_me));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("fake backend serves");
    });

    format!("http://{addr}/")
}

async fn client() -> HttpBackend {
    HttpBackend::new(spawn_backend().await, Duration::from_secs(2))
}

#[tokio::test]
async fn trailing_slash_is_trimmed_from_base_url() {
    let backend = HttpBackend::new("https://api.example.test/", Duration::from_secs(1));
    assert_eq!(backend.base_url(), "https://api.example.test");
}

#[tokio::test]
async fn decodes_catalog_payloads_leniently() {
    let backend = client().await;

    let products = backend.products().await.expect("products load");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].apr, 0.0);

    let product = backend.product("loan_1").await.expect("product loads");
    assert_eq!(product.product_type, ProductType::Loan);
    assert_eq!(product.max_amount, Some(3_000_000.0));
    assert_eq!(product.bank_name(), "Sberbank");
}

#[tokio::test]
async fn maps_error_statuses() {
    let backend = client().await;

    assert!(matches!(
        backend.product("missing").await,
        Err(BackendError::NotFound(endpoint)) if endpoint == "/api/product/missing"
    ));
    assert!(matches!(
        backend.top10().await,
        Err(BackendError::Status { status: 503 })
    ));
    assert!(matches!(
        backend.product("broken").await,
        Err(BackendError::Decode(_))
    ));
}

#[tokio::test]
async fn product_ids_stay_inside_their_path_segment() {
    let backend = client().await;

    let product = backend
        .product("../users/me")
        .await
        .expect("id reaches the product route");
    assert_eq!(product.id, "../users/me");

    assert!(matches!(
        backend.check_approval("../../users/me", "u-1").await,
        Err(BackendError::NotFound(endpoint)) if endpoint.starts_with("/api/products/..%2F")
    ));
}

#[tokio::test]
async fn malformed_base_url_is_reported() {
    let backend = HttpBackend::new("not a url", Duration::from_millis(300));
    assert!(matches!(
        backend.products().await,
        Err(BackendError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn search_posts_backend_shaped_body() {
    let backend = client().await;
    let params = SearchParams::for_amount(250_000.0).with_type(Some(ProductType::Card));

    let response = backend.search(&params).await.expect("search succeeds");
    assert_eq!(response.results.len(), 1);
    assert!(response.results[0].features.is_empty());
    assert_eq!(response.ai_summary.score, 77.0);
    assert_eq!(response.ai_summary.explanation, vec!["card", "true"]);
    assert!(response.ai_summary.suggestions.is_empty());
}

#[tokio::test]
async fn approval_check_sends_user_id_query() {
    let backend = client().await;

    let check = backend
        .check_approval("loan_1", "u-1")
        .await
        .expect("approval check succeeds");
    assert_eq!(check.chance, 64.0);
    assert_eq!(check.factors[0].weight, 35.0);
}

#[tokio::test]
async fn user_calls_carry_bearer_token() {
    let backend = client().await;

    let err = backend.me("wrong").await.expect_err("bad token rejected");
    assert!(err.is_unauthorized());

    let user = backend.me(TOKEN).await.expect("profile loads");
    assert_eq!(user.id, "u-1");
    assert_eq!(user.credit_score, Some(68.0));

    let patch = ProfilePatch {
        monthly_income: Some(95_000.0),
        monthly_expenses: Some(30_000.0),
        total_monthly_payments: Some(7_000.0),
    };
    let updated = backend
        .update_profile(TOKEN, &patch)
        .await
        .expect("profile updates");
    assert_eq!(updated.monthly_income, Some(95_000.0));
    assert_eq!(updated.total_monthly_payments, Some(7_000.0));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_millis(300));
    assert!(matches!(
        backend.products().await,
        Err(BackendError::Transport(_))
    ));
}
