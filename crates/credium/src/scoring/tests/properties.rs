use super::common::*;
use crate::scoring::{ApplicantProfile, PolicyPreset, ScoreEstimator, ScoringPolicy};

fn every_preset() -> Vec<(PolicyPreset, ScoreEstimator)> {
    [
        PolicyPreset::Canonical,
        PolicyPreset::Anonymous,
        PolicyPreset::Client,
    ]
    .into_iter()
    .map(|preset| (preset, ScoreEstimator::new(ScoringPolicy::preset(preset))))
    .collect()
}

#[test]
fn scores_stay_within_policy_bounds() {
    for (preset, estimator) in every_preset() {
        let bounds = estimator.policy().bounds;
        for income in income_grid() {
            for payments in payment_grid() {
                for amount in amount_grid() {
                    let result =
                        estimator.estimate(&ApplicantProfile::new(income, amount, payments));
                    assert!(
                        (bounds.min..=bounds.max).contains(&result.score),
                        "{} score {} out of bounds for income={income} payments={payments} amount={amount}",
                        preset.label(),
                        result.score
                    );
                    assert!(result.debt_to_income_ratio.is_finite());
                    assert!(result.payment_load.is_finite());
                }
            }
        }
    }
}

#[test]
fn higher_income_never_lowers_the_score() {
    for (preset, estimator) in every_preset() {
        for payments in payment_grid() {
            for amount in amount_grid() {
                let mut previous = 0u8;
                for income in income_grid() {
                    let score = estimator
                        .estimate(&ApplicantProfile::new(income, amount, payments))
                        .score;
                    assert!(
                        score >= previous,
                        "{} score fell to {score} from {previous} at income={income} payments={payments} amount={amount}",
                        preset.label()
                    );
                    previous = score;
                }
            }
        }
    }
}

#[test]
fn heavier_obligations_never_raise_the_score() {
    for (preset, estimator) in every_preset() {
        for income in income_grid() {
            for amount in amount_grid() {
                let mut previous = u8::MAX;
                for payments in payment_grid() {
                    let score = estimator
                        .estimate(&ApplicantProfile::new(income, amount, payments))
                        .score;
                    assert!(
                        score <= previous,
                        "{} score rose to {score} from {previous} at income={income} payments={payments} amount={amount}",
                        preset.label()
                    );
                    previous = score;
                }
            }
        }
    }
}

#[test]
fn factor_and_suggestion_lists_are_never_empty() {
    let estimator = estimator();
    for income in income_grid() {
        for payments in payment_grid() {
            let result = estimator.estimate(&ApplicantProfile::new(income, 300_000.0, payments));
            assert!(!result.explanation_factors.is_empty());
            assert!(!result.suggestions.is_empty());
        }
    }

    let empty = estimator.estimate(&ApplicantProfile::default());
    assert!(!empty.explanation_factors.is_empty());
    assert!(!empty.suggestions.is_empty());
}

#[test]
fn repeated_estimates_are_identical() {
    let estimator = estimator();
    for profile in [strong_profile(), stretched_profile(), ApplicantProfile::default()] {
        assert_eq!(estimator.estimate(&profile), estimator.estimate(&profile));
    }
}
