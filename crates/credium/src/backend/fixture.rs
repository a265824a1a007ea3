use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BackendError, CatalogBackend};
use crate::catalog::{
    fixture_products, search_products, top_products, ApprovalCheckResponse, ApprovalFactorWeight,
    Product, ProfilePatch, SearchParams, SearchResponse, UserProfile, TOP_LIMIT,
};
use crate::scoring::{ApplicantProfile, ScoreEstimator};

/// In-process backend over the built-in catalog, for offline runs and tests.
#[derive(Clone)]
pub struct FixtureBackend {
    products: Arc<Vec<Product>>,
    sessions: Arc<Mutex<HashMap<String, UserProfile>>>,
    estimator: ScoreEstimator,
}

impl Default for FixtureBackend {
    fn default() -> Self {
        Self::new(fixture_products())
    }
}

impl FixtureBackend {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            estimator: ScoreEstimator::default(),
        }
    }

    /// Registers a session token so `me` and `update_profile` can resolve it.
    pub fn with_session(self, token: impl Into<String>, user: UserProfile) -> Self {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(token.into(), user);
        self
    }

    pub fn session(&self, token: &str) -> Option<UserProfile> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
    }

    fn user_by_id(&self, user_id: &str) -> Option<UserProfile> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .values()
            .find(|user| user.id == user_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl CatalogBackend for FixtureBackend {
    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        Ok(self.products.as_ref().clone())
    }

    async fn top10(&self) -> Result<Vec<Product>, BackendError> {
        Ok(top_products(&self.products, TOP_LIMIT))
    }

    async fn product(&self, id: &str) -> Result<Product, BackendError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("/api/product/{id}")))
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, BackendError> {
        Ok(search_products(
            &self.products,
            Some(params.amount),
            params.product_type,
        ))
    }

    async fn check_approval(
        &self,
        product_id: &str,
        user_id: &str,
    ) -> Result<ApprovalCheckResponse, BackendError> {
        let product = self.product(product_id).await?;
        let user = self
            .user_by_id(user_id)
            .ok_or_else(|| BackendError::NotFound(format!("user {user_id}")))?;

        let mut profile = ApplicantProfile::new(
            user.monthly_income.unwrap_or(0.0),
            product.min_amount.unwrap_or(0.0),
            user.total_monthly_payments.unwrap_or(0.0),
        );
        profile.expenses = user.monthly_expenses;
        profile.credit_score_hint = user.credit_score;
        profile.product_type = Some(product.product_type);

        let estimate = self.estimator.estimate(&profile);
        let suggestions = if estimate.score < self.estimator.policy().recommended_at {
            vec![
                "Добавьте созаёмщика".to_string(),
                "Предоставьте залог".to_string(),
                "Уменьшите запрашиваемую сумму".to_string(),
            ]
        } else {
            vec!["Отличные шансы! Подайте заявку прямо сейчас".to_string()]
        };

        Ok(ApprovalCheckResponse {
            chance: f64::from(estimate.score),
            factors: [
                ("Длительность кредитной истории", 20.0),
                ("Уровень дохода", 35.0),
                ("Кредитный скоринг", 30.0),
                ("Текущая нагрузка", 15.0),
            ]
            .into_iter()
            .map(|(name, weight)| ApprovalFactorWeight {
                name: name.to_string(),
                weight,
            })
            .collect(),
            suggestions,
        })
    }

    async fn me(&self, token: &str) -> Result<UserProfile, BackendError> {
        self.session(token).ok_or(BackendError::Unauthorized)
    }

    async fn update_profile(
        &self,
        token: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, BackendError> {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let user = sessions.get_mut(token).ok_or(BackendError::Unauthorized)?;

        if let Some(income) = patch.monthly_income {
            user.monthly_income = Some(income);
        }
        if let Some(expenses) = patch.monthly_expenses {
            user.monthly_expenses = Some(expenses);
        }
        if let Some(payments) = patch.total_monthly_payments {
            user.total_monthly_payments = Some(payments);
        }

        Ok(user.clone())
    }
}
