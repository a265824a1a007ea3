//! HTML page handlers. Backend failures degrade to empty states or the local
//! estimate instead of failing the page.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use credium::backend::BackendError;
use credium::catalog::{filter_by_type, sort_by_ai_score, ProductType, SearchParams, UserProfile};
use credium::onboarding::{parse_existing_loans, LoanPurpose, OnboardingDraft, OnboardingWizard};
use credium::scoring::{rank_offers, ApplicantProfile, OfferFilter, OfferSort};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::infra::{form_number, session_token, WebState};
use crate::views;

pub(crate) type Params = HashMap<String, String>;

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn or_empty<T: Default>(result: Result<T, BackendError>, what: &'static str) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, what, "backend unavailable, rendering empty state");
        T::default()
    })
}

/// Signed-in user for the request's session cookie. Failures are logged and
/// treated as anonymous.
pub(crate) async fn signed_in_user(state: &WebState, headers: &HeaderMap) -> Option<UserProfile> {
    let token = session_token(headers)?;
    match state.backend.me(&token).await {
        Ok(user) => Some(user),
        Err(err) if err.is_unauthorized() => None,
        Err(err) => {
            warn!(error = %err, "could not load signed-in user, using anonymous estimate");
            None
        }
    }
}

/// Applicant inputs carried between the results and offers pages.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProfileQuery {
    pub(crate) product_type: ProductType,
    pub(crate) amount: f64,
    pub(crate) income: f64,
    pub(crate) expenses: f64,
    pub(crate) total_monthly_payments: f64,
}

impl ProfileQuery {
    /// Results page: nothing is assumed about the applicant except expenses.
    pub(crate) fn for_results(params: &Params) -> Self {
        Self::parse(params, 0.0, 0.0)
    }

    /// Offers page: falls back to the wizard's initial values.
    pub(crate) fn for_offers(params: &Params) -> Self {
        let defaults = OnboardingDraft::default();
        Self::parse(params, defaults.amount, defaults.income)
    }

    fn parse(params: &Params, amount: f64, income: f64) -> Self {
        let defaults = OnboardingDraft::default();
        Self {
            product_type: param(params, "type")
                .and_then(ProductType::parse)
                .unwrap_or(defaults.product_type),
            amount: form_number(param(params, "amount"), amount),
            income: form_number(param(params, "income"), income),
            expenses: form_number(param(params, "expenses"), defaults.expenses),
            total_monthly_payments: form_number(param(params, "totalMonthlyPayments"), 0.0),
        }
    }

    pub(crate) fn applicant_profile(&self, user: Option<&UserProfile>) -> ApplicantProfile {
        let mut profile =
            ApplicantProfile::new(self.income, self.amount, self.total_monthly_payments)
                .with_expenses(self.expenses)
                .with_product_type(self.product_type);
        profile.credit_score_hint = user.and_then(|user| user.credit_score);
        profile
    }

    pub(crate) fn query_string(&self) -> String {
        format!(
            "type={}&amount={}&income={}&expenses={}&totalMonthlyPayments={}",
            self.product_type.code(),
            self.amount,
            self.income,
            self.expenses,
            self.total_monthly_payments
        )
    }

    pub(crate) fn search_params(&self) -> SearchParams {
        SearchParams::for_amount(self.amount).with_type(Some(self.product_type))
    }
}

pub(crate) fn offer_filter(params: &Params) -> OfferFilter {
    let defaults = OfferFilter::default();
    OfferFilter {
        min_amount: form_number(param(params, "minAmount"), defaults.min_amount),
        max_amount: form_number(param(params, "maxAmount"), defaults.max_amount),
        min_apr: form_number(param(params, "minApr"), defaults.min_apr),
        max_apr: form_number(param(params, "maxApr"), defaults.max_apr),
        sort_by: param(params, "sortBy")
            .and_then(OfferSort::parse)
            .unwrap_or_default(),
    }
}

pub(crate) async fn home(State(state): State<WebState>) -> Html<String> {
    let top = or_empty(state.backend.top10().await, "top10");
    views::home(&top)
}

pub(crate) async fn catalog(
    State(state): State<WebState>,
    Query(params): Query<Params>,
) -> Html<String> {
    let selected = param(&params, "type").and_then(ProductType::parse);
    let products = or_empty(state.backend.products().await, "products");
    views::catalog(&filter_by_type(&products, selected), selected)
}

pub(crate) async fn search(
    State(state): State<WebState>,
    Query(params): Query<Params>,
) -> Html<String> {
    let amount = form_number(param(&params, "amount"), 0.0);
    if amount <= 0.0 {
        return views::search_prompt();
    }

    let product_type = param(&params, "type").and_then(ProductType::parse);
    let term = param(&params, "term").and_then(|raw| raw.parse::<u32>().ok());
    let request = SearchParams::for_amount(amount)
        .with_type(product_type)
        .with_term(term);

    let mut response = or_empty(state.backend.search(&request).await, "search");
    sort_by_ai_score(&mut response.results);
    views::search_results(&response, amount, product_type)
}

pub(crate) async fn product(
    State(state): State<WebState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let product = match state.backend.product(&id).await {
        Ok(product) => product,
        Err(BackendError::NotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                views::not_found("Такого продукта нет в каталоге"),
            )
                .into_response()
        }
        Err(err) => {
            warn!(error = %err, product = %id, "product unavailable");
            return (StatusCode::BAD_GATEWAY, views::backend_unavailable()).into_response();
        }
    };

    let approval = match signed_in_user(&state, &headers).await {
        Some(user) => match state.backend.check_approval(&id, &user.id).await {
            Ok(check) => Some(check),
            Err(err) => {
                warn!(error = %err, product = %id, "approval check failed");
                None
            }
        },
        None => None,
    };

    views::product_details(&product, approval.as_ref()).into_response()
}

fn draft_from_params(params: &Params) -> OnboardingDraft {
    let defaults = OnboardingDraft::default();
    OnboardingDraft {
        product_type: param(params, "type")
            .and_then(ProductType::parse)
            .unwrap_or(defaults.product_type),
        amount: form_number(param(params, "amount"), defaults.amount),
        purpose: param(params, "purpose").and_then(LoanPurpose::parse),
        other_purpose: param(params, "other_purpose").map(str::to_string),
        income: form_number(param(params, "income"), defaults.income),
        expenses: form_number(param(params, "expenses"), defaults.expenses),
        existing_loans: param(params, "loans")
            .map(parse_existing_loans)
            .unwrap_or_default(),
    }
}

pub(crate) async fn onboarding(
    State(state): State<WebState>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    let mut draft = draft_from_params(&params);
    if params.is_empty() {
        if let Some(user) = signed_in_user(&state, &headers).await {
            draft.prefill_from(&user);
        }
    }

    let step = param(&params, "step")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or_default();
    let mut wizard = OnboardingWizard::at_step(step, draft);

    match param(&params, "action") {
        Some("back") => {
            wizard.back();
        }
        Some("finish") if wizard.is_last() => return finish_onboarding(&state, &headers, wizard).await,
        Some("next") | Some("finish") => {
            wizard.next();
        }
        _ => {}
    }

    views::onboarding(&wizard).into_response()
}

async fn finish_onboarding(
    state: &WebState,
    headers: &HeaderMap,
    wizard: OnboardingWizard,
) -> Response {
    let draft = wizard.draft;
    let estimate = state.estimator.estimate(&draft.applicant_profile());
    info!(
        score = estimate.score,
        band = estimate.band.code(),
        "onboarding finished"
    );

    if let Some(token) = session_token(headers) {
        match state
            .backend
            .update_profile(&token, &draft.profile_patch())
            .await
        {
            Ok(user) => info!(user = %user.id, "saved onboarding profile"),
            Err(err) => warn!(error = %err, "failed to save onboarding profile"),
        }
    }

    Redirect::to(&format!("/ai-results?{}", draft.results_query())).into_response()
}

pub(crate) async fn ai_results(
    State(state): State<WebState>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Html<String> {
    let query = ProfileQuery::for_results(&params);
    let user = signed_in_user(&state, &headers).await;
    let result = state
        .estimator
        .estimate(&query.applicant_profile(user.as_ref()));

    views::ai_results(&result, user.is_some(), &query.query_string())
}

pub(crate) async fn personal_offers(
    State(state): State<WebState>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Html<String> {
    let query = ProfileQuery::for_offers(&params);
    let filter = offer_filter(&params);

    let products = or_empty(state.backend.search(&query.search_params()).await, "offers").results;
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

    views::personal_offers(&offers, &filter, &estimate, &query.query_string())
}
