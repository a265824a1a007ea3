use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::ProductType;

/// Applicant data collected from query parameters or the onboarding wizard.
///
/// Every numeric field is optional so that loosely-typed form input can be
/// deserialized as-is: blank or unparseable numbers and unknown product types
/// read as absent. [`ApplicantProfile::sanitized`] turns it into the clean
/// input the estimator works on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    #[serde(default, deserialize_with = "lenient_number")]
    pub income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub expenses: Option<f64>,
    #[serde(
        default,
        alias = "totalMonthlyPayments",
        deserialize_with = "lenient_number"
    )]
    pub existing_monthly_payments: Option<f64>,
    #[serde(default, alias = "amount", deserialize_with = "lenient_number")]
    pub requested_amount: Option<f64>,
    #[serde(default, alias = "creditScore", deserialize_with = "lenient_number")]
    pub credit_score_hint: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub employment_years: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient_product_type")]
    pub product_type: Option<ProductType>,
}

impl ApplicantProfile {
    pub fn new(income: f64, requested_amount: f64, existing_monthly_payments: f64) -> Self {
        Self {
            income: Some(income),
            requested_amount: Some(requested_amount),
            existing_monthly_payments: Some(existing_monthly_payments),
            ..Self::default()
        }
    }

    pub fn with_expenses(mut self, expenses: f64) -> Self {
        self.expenses = Some(expenses);
        self
    }

    pub fn with_credit_score_hint(mut self, hint: f64) -> Self {
        self.credit_score_hint = Some(hint);
        self
    }

    pub fn with_employment_years(mut self, years: f64) -> Self {
        self.employment_years = Some(years);
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    /// Coerces missing, non-finite, and negative numbers to zero and clamps the
    /// credit hint into 0..=100. Optional signals stay optional.
    pub fn sanitized(&self) -> SanitizedProfile {
        SanitizedProfile {
            income: non_negative(self.income),
            expenses: non_negative(self.expenses),
            existing_monthly_payments: non_negative(self.existing_monthly_payments),
            requested_amount: non_negative(self.requested_amount),
            credit_score_hint: self
                .credit_score_hint
                .map(|hint| non_negative(Some(hint)).min(100.0)),
            employment_years: self.employment_years.map(|years| non_negative(Some(years))),
        }
    }
}

/// Boundary-cleaned profile; all amounts are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SanitizedProfile {
    pub income: f64,
    pub expenses: f64,
    pub existing_monthly_payments: f64,
    pub requested_amount: f64,
    pub credit_score_hint: Option<f64>,
    pub employment_years: Option<f64>,
}

impl SanitizedProfile {
    /// Existing monthly obligations as a percentage of income, zero without income.
    pub fn debt_to_income_percent(&self) -> f64 {
        if self.income > 0.0 {
            self.existing_monthly_payments / self.income * 100.0
        } else {
            0.0
        }
    }
}

/// JSON numbers, numeric strings (form input), or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseValue>::deserialize(deserializer)? {
        Some(LooseValue::Number(value)) => Some(value),
        Some(LooseValue::Text(value)) => value
            .trim()
            .replace([' ', '\u{a0}'], "")
            .parse::<f64>()
            .ok(),
        Some(LooseValue::Other(_)) | None => None,
    })
}

fn lenient_product_type<'de, D>(deserializer: D) -> Result<Option<ProductType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseValue>::deserialize(deserializer)? {
        Some(LooseValue::Text(value)) => ProductType::parse(&value),
        _ => None,
    })
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}
