use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Credit product categories offered by partner banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Card,
    Loan,
    Microloan,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::Card, ProductType::Loan, ProductType::Microloan];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "card" => Some(Self::Card),
            "loan" => Some(Self::Loan),
            "microloan" => Some(Self::Microloan),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            ProductType::Card => "card",
            ProductType::Loan => "loan",
            ProductType::Microloan => "microloan",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProductType::Card => "Кредитная карта",
            ProductType::Loan => "Кредит наличными",
            ProductType::Microloan => "Микрозайм",
        }
    }
}

/// Bank offer as returned by the backend catalog.
///
/// Optional and list fields default when absent or `null`, so partial payloads
/// never fail a page render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub apr: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monthly: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
}

impl Product {
    pub fn bank_name(&self) -> &str {
        self.bank.as_deref().unwrap_or("Банк")
    }
}

/// Score summary attached to search responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiScoreSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub amount: f64,
    pub period: u32,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    pub expenses: f64,
    pub total_monthly_payments: f64,
}

impl SearchParams {
    pub fn for_amount(amount: f64) -> Self {
        Self {
            amount,
            period: 12,
            product_type: None,
            term: None,
            credit_score: None,
            income: None,
            expenses: 0.0,
            total_monthly_payments: 0.0,
        }
    }

    pub fn with_type(mut self, product_type: Option<ProductType>) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn with_term(mut self, term: Option<u32>) -> Self {
        self.term = term;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_summary: AiScoreSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalFactorWeight {
    pub name: String,
    #[serde(default)]
    pub weight: f64,
}

/// Response of the per-product approval check endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApprovalCheckResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chance: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub factors: Vec<ApprovalFactorWeight>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

/// Signed-in user as exposed by `/api/users/me`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub total_monthly_payments: Option<f64>,
    #[serde(default)]
    pub ai_score: Option<f64>,
    #[serde(default)]
    pub credit_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update sent to `PATCH /api/users/me` after onboarding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_monthly_payments: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let trimmed = value.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_defaults_missing_and_null_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id": "loan_9", "type": "loan", "apr": null, "features": null, "ai_score": 61}"#,
        )
        .expect("product parses");

        assert_eq!(product.apr, 0.0);
        assert!(product.features.is_empty());
        assert!(product.requirements.is_empty());
        assert_eq!(product.ai_score, 61.0);
        assert_eq!(product.max_amount, None);
        assert_eq!(product.bank_name(), "Банк");
    }

    #[test]
    fn user_profile_ignores_unparseable_dates() {
        let user: UserProfile = serde_json::from_str(
            r#"{
                "id": "u-1",
                "email": "anna@example.com",
                "full_name": null,
                "birth_date": "not a date",
                "created_at": "2025-03-04T10:15:00",
                "credit_score": 72
            }"#,
        )
        .expect("user parses");

        assert_eq!(user.full_name, "");
        assert_eq!(user.birth_date, None);
        assert!(user.created_at.is_some());
        assert_eq!(user.credit_score, Some(72.0));
    }

    #[test]
    fn search_params_serialize_in_backend_shape() {
        let params = SearchParams::for_amount(300_000.0).with_type(Some(ProductType::Loan));
        let value = serde_json::to_value(&params).expect("serializes");

        assert_eq!(value["type"], "loan");
        assert_eq!(value["totalMonthlyPayments"], 0.0);
        assert!(value.get("term").is_none());
    }
}
