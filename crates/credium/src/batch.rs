//! CSV batch scoring: one applicant per row in, one estimate per row out.

use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};

use crate::catalog::ProductType;
use crate::scoring::{ApplicantProfile, ScoreEstimator};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read applicant CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    expenses: Option<f64>,
    #[serde(
        default,
        rename = "totalMonthlyPayments",
        alias = "total_monthly_payments",
        deserialize_with = "lenient_number"
    )]
    total_monthly_payments: Option<f64>,
    #[serde(
        default,
        rename = "creditScore",
        alias = "credit_score",
        deserialize_with = "lenient_number"
    )]
    credit_score: Option<f64>,
    #[serde(
        default,
        rename = "employmentYears",
        alias = "employment_years",
        deserialize_with = "lenient_number"
    )]
    employment_years: Option<f64>,
    #[serde(default, rename = "type")]
    product_type: Option<String>,
}

impl ApplicantRow {
    fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            income: self.income,
            expenses: self.expenses,
            existing_monthly_payments: self.total_monthly_payments,
            requested_amount: self.amount,
            credit_score_hint: self.credit_score,
            employment_years: self.employment_years,
            product_type: self.product_type.as_deref().and_then(ProductType::parse),
        }
    }
}

/// One scored row of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEstimate {
    pub id: String,
    pub score: u8,
    pub band: &'static str,
    pub debt_to_income_ratio: f64,
    pub explanation: String,
    pub suggestions: String,
}

/// Scores every row of `reader`. Unreadable numbers score as zero rather than
/// failing the batch; only structural CSV errors abort.
pub fn score_csv<R: Read>(
    reader: R,
    estimator: &ScoreEstimator,
) -> Result<Vec<BatchEstimate>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut estimates = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let row = record?;
        let result = estimator.estimate(&row.profile());

        estimates.push(BatchEstimate {
            id: row
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("row-{}", index + 1)),
            score: result.score,
            band: result.band.code(),
            debt_to_income_ratio: (result.debt_to_income_ratio * 10.0).round() / 10.0,
            explanation: result.explanation_messages().join("; "),
            suggestions: result.suggestion_messages().join("; "),
        });
    }

    Ok(estimates)
}

pub fn write_csv<W: Write>(writer: W, estimates: &[BatchEstimate]) -> Result<(), BatchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for estimate in estimates {
        csv_writer.serialize(estimate)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().replace(' ', "").parse::<f64>().ok()))
}
