use super::policy::{LoadBand, LoadBasis, ScoringPolicy, Tier};
use super::profile::SanitizedProfile;
use super::{ScoreComponent, ScoreFactorKind};

/// Which end of the policy's load bands the applicant landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadStanding {
    /// The most favourable band.
    Light,
    Moderate,
    /// The least favourable band, or past every band.
    Heavy,
}

pub(crate) struct ScoreSignals {
    pub debt_to_income_percent: f64,
    pub payment_load: f64,
    pub load_standing: LoadStanding,
    pub raw_score: i32,
}

pub(crate) fn score_profile(
    profile: &SanitizedProfile,
    policy: &ScoringPolicy,
) -> (Vec<ScoreComponent>, ScoreSignals) {
    let mut components = Vec::new();

    components.push(ScoreComponent {
        factor: ScoreFactorKind::Base,
        points: policy.base,
        notes: "base score".to_string(),
    });

    if let Some(tier) = highest_tier(&policy.income_tiers, profile.income) {
        components.push(ScoreComponent {
            factor: ScoreFactorKind::Income,
            points: tier.points,
            notes: format!(
                "monthly income {:.0} reaches tier {:.0}",
                profile.income, tier.at_least
            ),
        });
    }

    let monthly_obligations = monthly_obligations(profile, policy);
    let payment_load = if profile.income > 0.0 {
        monthly_obligations / profile.income
    } else {
        0.0
    };

    // No income with obligations to service is the heaviest possible load.
    let overloaded_without_income = profile.income <= 0.0 && monthly_obligations > 0.0;
    let fired_band = if overloaded_without_income {
        None
    } else {
        load_band(&policy.load_bands, payment_load)
    };
    let load_points = fired_band.map_or(policy.overload_points, |band| band.points);
    let load_standing = standing(&policy.load_bands, fired_band);
    components.push(ScoreComponent {
        factor: ScoreFactorKind::PaymentLoad,
        points: load_points,
        notes: if overloaded_without_income {
            format!("obligations of {monthly_obligations:.0} per month without income")
        } else {
            format!("payment load {:.0}% of income", payment_load * 100.0)
        },
    });

    let amount_ceiling = profile.income * policy.reasonable_amount_income_months;
    if policy.reasonable_amount_points != 0 && profile.requested_amount <= amount_ceiling {
        components.push(ScoreComponent {
            factor: ScoreFactorKind::RequestedAmount,
            points: policy.reasonable_amount_points,
            notes: format!(
                "requested {:.0} within {:.0} months of income",
                profile.requested_amount, policy.reasonable_amount_income_months
            ),
        });
    }

    if let Some(hint) = profile.credit_score_hint {
        if !policy.credit_hint_tiers.is_empty() {
            let points = highest_tier(&policy.credit_hint_tiers, hint)
                .map(|tier| tier.points)
                .unwrap_or(policy.credit_hint_floor_points);
            components.push(ScoreComponent {
                factor: ScoreFactorKind::CreditHint,
                points,
                notes: format!("credit score hint {hint:.0}"),
            });
        }
    }

    if let Some(years) = profile.employment_years.or(policy.default_employment_years) {
        if let Some(tier) = highest_tier(&policy.employment_tiers, years) {
            components.push(ScoreComponent {
                factor: ScoreFactorKind::Employment,
                points: tier.points,
                notes: format!("{years:.1} year(s) with current employer"),
            });
        }
    }

    let raw_score = components
        .iter()
        .map(|component| i32::from(component.points))
        .sum();

    let signals = ScoreSignals {
        debt_to_income_percent: profile.debt_to_income_percent(),
        payment_load,
        load_standing,
        raw_score,
    };

    (components, signals)
}

fn monthly_obligations(profile: &SanitizedProfile, policy: &ScoringPolicy) -> f64 {
    match policy.load_basis {
        LoadBasis::ExistingPayments => profile.existing_monthly_payments,
        LoadBasis::ExistingAndInstallment => {
            let term = f64::from(policy.installment_term_months.max(1));
            profile.requested_amount / term + profile.existing_monthly_payments
        }
    }
}

fn standing(bands: &[LoadBand], fired: Option<&LoadBand>) -> LoadStanding {
    let Some(fired) = fired else {
        return LoadStanding::Heavy;
    };
    let lightest = bands.iter().map(|band| band.below).fold(f64::INFINITY, f64::min);
    let heaviest = bands
        .iter()
        .map(|band| band.below)
        .fold(f64::NEG_INFINITY, f64::max);

    if fired.below <= lightest {
        LoadStanding::Light
    } else if fired.below >= heaviest {
        LoadStanding::Heavy
    } else {
        LoadStanding::Moderate
    }
}

fn highest_tier(tiers: &[Tier], value: f64) -> Option<&Tier> {
    tiers
        .iter()
        .filter(|tier| value >= tier.at_least)
        .max_by(|a, b| a.at_least.total_cmp(&b.at_least))
}

fn load_band(bands: &[LoadBand], ratio: f64) -> Option<&LoadBand> {
    bands
        .iter()
        .filter(|band| ratio < band.below)
        .min_by(|a, b| a.below.total_cmp(&b.below))
}
