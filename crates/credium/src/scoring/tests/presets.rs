use crate::scoring::{
    ApplicantProfile, ExplanationFactor, ScoreEstimator, ScoreFactorKind, ScoringPolicy,
    Suggestion,
};

fn anonymous() -> ScoreEstimator {
    ScoreEstimator::new(ScoringPolicy::anonymous())
}

fn client() -> ScoreEstimator {
    ScoreEstimator::new(ScoringPolicy::client())
}

#[test]
fn anonymous_preset_rewards_light_debt_load() {
    // 70 base, +15 income tier, +10 light load, +5 sensible amount; capped at 95.
    let result = anonymous().estimate(&ApplicantProfile::new(120_000.0, 500_000.0, 12_000.0));
    assert_eq!(result.score, 95);
    assert!(result
        .explanation_factors
        .contains(&ExplanationFactor::HighIncome));
}

#[test]
fn anonymous_preset_floors_heavy_debt_load() {
    let result = anonymous().estimate(&ApplicantProfile::new(30_000.0, 1_000_000.0, 24_000.0));

    // 70 base, -15 overload, no amount bonus.
    assert_eq!(result.score, 55);
    assert!((result.debt_to_income_ratio - 80.0).abs() < 1e-9);
    assert_eq!(
        result.suggestions,
        vec![
            Suggestion::ReduceDebtLoad,
            Suggestion::ConsiderSmallerAmount,
            Suggestion::ConfirmAdditionalIncome,
        ]
    );
}

#[test]
fn anonymous_preset_ignores_credit_hint() {
    let profile = ApplicantProfile::new(60_000.0, 100_000.0, 0.0);
    let without = anonymous().estimate(&profile);
    let with = anonymous().estimate(&profile.with_credit_score_hint(95.0));
    assert_eq!(without.score, with.score);
    assert!(with
        .components
        .iter()
        .all(|component| component.factor != ScoreFactorKind::CreditHint));
}

#[test]
fn client_preset_assumes_one_year_of_employment() {
    // 50 base, +25 load (10k + 5k on 60k), +5 default employment.
    let result = client().estimate(&ApplicantProfile::new(60_000.0, 120_000.0, 5_000.0));
    assert_eq!(result.score, 80);
    assert!(result
        .components
        .iter()
        .any(|component| component.factor == ScoreFactorKind::Employment && component.points == 5));
    assert!(result
        .components
        .iter()
        .all(|component| component.factor != ScoreFactorKind::Income));
}

#[test]
fn client_preset_scores_credit_hint_and_overload() {
    // 50 base, -10 overload, +25 credit hint, +5 default employment.
    let result = client().estimate(
        &ApplicantProfile::new(20_000.0, 600_000.0, 10_000.0).with_credit_score_hint(90.0),
    );
    assert_eq!(result.score, 70);
}
