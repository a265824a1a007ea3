//! Approval / AI score estimator.
//!
//! A single pure function over an applicant profile, driven by an explicit
//! [`ScoringPolicy`]. Every page that shows a score goes through
//! [`ScoreEstimator::estimate`], so the same input always yields the same
//! number, factors, and suggestions.

mod narrative;
mod offers;
mod policy;
mod profile;
mod rules;

#[cfg(test)]
mod tests;

pub use narrative::{ExplanationFactor, ScoreBand, Suggestion};
pub use offers::{rank_offers, OfferFilter, OfferSort, RankedOffer};
pub use policy::{
    BandThresholds, LoadBand, LoadBasis, NarrativeThresholds, PolicyError, PolicyPreset,
    ScoreBounds, ScoringPolicy, Tier,
};
pub use profile::{ApplicantProfile, SanitizedProfile};

use serde::{Deserialize, Serialize};

/// Stateless estimator applying a policy to applicant profiles.
#[derive(Debug, Clone, Default)]
pub struct ScoreEstimator {
    policy: ScoringPolicy,
}

impl ScoreEstimator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn estimate(&self, profile: &ApplicantProfile) -> ScoreResult {
        let clean = profile.sanitized();
        let (components, signals) = rules::score_profile(&clean, &self.policy);

        let score = self.policy.bounds.clamp(signals.raw_score);
        let band = ScoreBand::from_score(score, &self.policy.bands);
        let explanation_factors = narrative::explanation_factors(
            &clean,
            &self.policy.narrative,
            signals.debt_to_income_percent,
            signals.load_standing,
        );
        let suggestions = narrative::suggestions(
            &clean,
            &self.policy.narrative,
            signals.debt_to_income_percent,
            signals.load_standing,
        );

        ScoreResult {
            score,
            band,
            debt_to_income_ratio: signals.debt_to_income_percent,
            payment_load: signals.payment_load,
            explanation_factors,
            suggestions,
            components,
        }
    }
}

/// Scoring factor a component was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactorKind {
    Base,
    Income,
    PaymentLoad,
    RequestedAmount,
    CreditHint,
    Employment,
}

/// Discrete contribution to a score, kept for transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactorKind,
    pub points: i16,
    pub notes: String,
}

/// Estimator output. Recomputed on every call and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub band: ScoreBand,
    /// Existing monthly obligations as a percentage of income.
    pub debt_to_income_ratio: f64,
    /// Monthly obligations under the policy's load basis, as a fraction of income.
    pub payment_load: f64,
    pub explanation_factors: Vec<ExplanationFactor>,
    pub suggestions: Vec<Suggestion>,
    pub components: Vec<ScoreComponent>,
}

impl ScoreResult {
    pub fn explanation_messages(&self) -> Vec<String> {
        self.explanation_factors
            .iter()
            .map(|factor| factor.message().to_string())
            .collect()
    }

    pub fn suggestion_messages(&self) -> Vec<String> {
        self.suggestions
            .iter()
            .map(|suggestion| suggestion.message().to_string())
            .collect()
    }
}
