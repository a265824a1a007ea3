use crate::catalog::{fixture_products, Product};
use crate::scoring::{ApplicantProfile, ScoreEstimator, ScoringPolicy};

pub(super) fn estimator() -> ScoreEstimator {
    ScoreEstimator::new(ScoringPolicy::canonical())
}

pub(super) fn strong_profile() -> ApplicantProfile {
    ApplicantProfile::new(100_000.0, 300_000.0, 0.0).with_expenses(40_000.0)
}

pub(super) fn stretched_profile() -> ApplicantProfile {
    ApplicantProfile::new(20_000.0, 1_000_000.0, 15_000.0).with_expenses(15_000.0)
}

pub(super) fn products() -> Vec<Product> {
    fixture_products()
}

/// Incomes crossing every canonical income tier and load band.
pub(super) fn income_grid() -> Vec<f64> {
    let mut incomes = vec![0.0, 1.0, 500.0];
    incomes.extend((1..=60u32).map(|step| f64::from(step) * 2_500.0));
    incomes.extend([175_000.0, 250_000.0, 1_000_000.0]);
    incomes
}

pub(super) fn payment_grid() -> Vec<f64> {
    let mut payments = vec![0.0, 1.0];
    payments.extend((1..=40u32).map(|step| f64::from(step) * 1_500.0));
    payments
}

pub(super) fn amount_grid() -> Vec<f64> {
    vec![0.0, 10_000.0, 300_000.0, 1_000_000.0, 5_000_000.0]
}
