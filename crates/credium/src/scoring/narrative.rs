use serde::{Deserialize, Serialize};

use super::policy::{BandThresholds, NarrativeThresholds};
use super::profile::SanitizedProfile;
use super::rules::LoadStanding;

/// Positive aspects of a profile shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationFactor {
    StableIncome,
    HighIncome,
    LowDebtLoad,
    NoExistingObligations,
    ReasonableAmount,
    ProfileAnalysed,
}

impl ExplanationFactor {
    pub const fn message(self) -> &'static str {
        match self {
            ExplanationFactor::StableIncome => "Стабильный доход",
            ExplanationFactor::HighIncome => "Высокий уровень дохода",
            ExplanationFactor::LowDebtLoad => "Низкая долговая нагрузка",
            ExplanationFactor::NoExistingObligations => "Нет текущих обязательств",
            ExplanationFactor::ReasonableAmount => "Адекватная запрашиваемая сумма",
            ExplanationFactor::ProfileAnalysed => "Анализ вашего профиля",
        }
    }
}

/// Improvement hints; `ProfileLooksGood` is the encouraging fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    ReduceDebtLoad,
    ConsiderSmallerAmount,
    ConfirmAdditionalIncome,
    ProfileLooksGood,
}

impl Suggestion {
    pub const fn message(self) -> &'static str {
        match self {
            Suggestion::ReduceDebtLoad => "Снизьте долговую нагрузку перед новой заявкой",
            Suggestion::ConsiderSmallerAmount => "Рассмотрите меньшую сумму для повышения шансов",
            Suggestion::ConfirmAdditionalIncome => "Подтвердите дополнительные источники дохода",
            Suggestion::ProfileLooksGood => "У вас хороший профиль для получения кредита",
        }
    }
}

pub(crate) fn explanation_factors(
    profile: &SanitizedProfile,
    thresholds: &NarrativeThresholds,
    debt_to_income_percent: f64,
    load: LoadStanding,
) -> Vec<ExplanationFactor> {
    let mut factors = Vec::new();

    if profile.income >= thresholds.stable_income {
        factors.push(ExplanationFactor::StableIncome);
    }
    if profile.income >= thresholds.high_income {
        factors.push(ExplanationFactor::HighIncome);
    }
    if profile.income > 0.0
        && load == LoadStanding::Light
        && debt_to_income_percent < thresholds.low_debt_percent
    {
        factors.push(ExplanationFactor::LowDebtLoad);
    }
    if profile.existing_monthly_payments <= 0.0 {
        factors.push(ExplanationFactor::NoExistingObligations);
    }
    if profile.income > 0.0
        && profile.requested_amount <= profile.income * thresholds.reasonable_amount_income_months
    {
        factors.push(ExplanationFactor::ReasonableAmount);
    }

    if factors.is_empty() {
        factors.push(ExplanationFactor::ProfileAnalysed);
    }
    factors
}

pub(crate) fn suggestions(
    profile: &SanitizedProfile,
    thresholds: &NarrativeThresholds,
    debt_to_income_percent: f64,
    load: LoadStanding,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    // Heavy covers obligations without income as well.
    if debt_to_income_percent >= thresholds.high_debt_percent || load == LoadStanding::Heavy {
        suggestions.push(Suggestion::ReduceDebtLoad);
    }
    if profile.requested_amount > profile.income * thresholds.oversized_amount_income_months {
        suggestions.push(Suggestion::ConsiderSmallerAmount);
    }
    if profile.income < thresholds.low_income {
        suggestions.push(Suggestion::ConfirmAdditionalIncome);
    }

    if suggestions.is_empty() {
        suggestions.push(Suggestion::ProfileLooksGood);
    }
    suggestions
}

/// Coarse chance label for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u8, thresholds: &BandThresholds) -> Self {
        if score >= thresholds.high {
            ScoreBand::High
        } else if score >= thresholds.medium {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "Высокий шанс",
            ScoreBand::Medium => "Средний шанс",
            ScoreBand::Low => "Низкий шанс",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }
}
