use serde::{Deserialize, Serialize};
use std::path::Path;

/// Threshold tier; the tier with the highest `at_least` not above the value wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub at_least: f64,
    pub points: i16,
}

/// Payment-load band; the band with the smallest `below` above the ratio wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadBand {
    pub below: f64,
    pub points: i16,
}

/// Which monthly obligations count towards the payment load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBasis {
    /// Only the obligations the applicant already services.
    ExistingPayments,
    /// Existing obligations plus the requested amount spread over the installment term.
    ExistingAndInstallment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: u8,
    pub max: u8,
}

impl ScoreBounds {
    pub fn clamp(&self, raw: i32) -> u8 {
        raw.clamp(i32::from(self.min), i32::from(self.max)) as u8
    }
}

/// Score cut-offs used for the user-facing chance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub high: u8,
    pub medium: u8,
}

/// Thresholds for the explanation factors and improvement suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeThresholds {
    pub stable_income: f64,
    pub high_income: f64,
    pub low_debt_percent: f64,
    pub high_debt_percent: f64,
    pub reasonable_amount_income_months: f64,
    pub oversized_amount_income_months: f64,
    pub low_income: f64,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self {
            stable_income: 50_000.0,
            high_income: 100_000.0,
            low_debt_percent: 30.0,
            high_debt_percent: 40.0,
            reasonable_amount_income_months: 12.0,
            oversized_amount_income_months: 24.0,
            low_income: 50_000.0,
        }
    }
}

/// Weights and thresholds driving the approval estimate.
///
/// Deserialization starts from [`ScoringPolicy::canonical`], so a policy file
/// only has to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base: i16,
    pub bounds: ScoreBounds,
    pub income_tiers: Vec<Tier>,
    pub load_basis: LoadBasis,
    pub installment_term_months: u32,
    pub load_bands: Vec<LoadBand>,
    pub overload_points: i16,
    pub reasonable_amount_income_months: f64,
    pub reasonable_amount_points: i16,
    pub credit_hint_tiers: Vec<Tier>,
    pub credit_hint_floor_points: i16,
    pub employment_tiers: Vec<Tier>,
    pub default_employment_years: Option<f64>,
    pub bands: BandThresholds,
    pub recommended_at: u8,
    pub narrative: NarrativeThresholds,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ScoringPolicy {
    /// Unified policy: client-estimator base and bounds with the income and
    /// requested-amount bonuses of the pre-registration estimate.
    pub fn canonical() -> Self {
        Self {
            base: 50,
            bounds: ScoreBounds { min: 5, max: 99 },
            income_tiers: vec![
                Tier {
                    at_least: 50_000.0,
                    points: 10,
                },
                Tier {
                    at_least: 100_000.0,
                    points: 15,
                },
            ],
            load_basis: LoadBasis::ExistingAndInstallment,
            installment_term_months: 12,
            load_bands: vec![
                LoadBand {
                    below: 0.3,
                    points: 25,
                },
                LoadBand {
                    below: 0.5,
                    points: 15,
                },
                LoadBand {
                    below: 0.7,
                    points: 0,
                },
            ],
            overload_points: -15,
            reasonable_amount_income_months: 12.0,
            reasonable_amount_points: 5,
            credit_hint_tiers: credit_hint_tiers(),
            credit_hint_floor_points: -5,
            employment_tiers: employment_tiers(),
            default_employment_years: None,
            bands: BandThresholds {
                high: 75,
                medium: 50,
            },
            recommended_at: 70,
            narrative: NarrativeThresholds::default(),
        }
    }

    /// Pre-registration estimate shown to anonymous visitors on the results page.
    pub fn anonymous() -> Self {
        Self {
            base: 70,
            bounds: ScoreBounds { min: 30, max: 95 },
            load_basis: LoadBasis::ExistingPayments,
            load_bands: vec![
                LoadBand {
                    below: 0.3,
                    points: 10,
                },
                LoadBand {
                    below: 0.4,
                    points: 5,
                },
                LoadBand {
                    below: 0.5,
                    points: 0,
                },
            ],
            overload_points: -15,
            credit_hint_tiers: Vec::new(),
            credit_hint_floor_points: 0,
            employment_tiers: Vec::new(),
            ..Self::canonical()
        }
    }

    /// Client-side approval estimator used by the product pages.
    pub fn client() -> Self {
        Self {
            income_tiers: Vec::new(),
            load_bands: vec![
                LoadBand {
                    below: 0.3,
                    points: 25,
                },
                LoadBand {
                    below: 0.5,
                    points: 15,
                },
                LoadBand {
                    below: 0.7,
                    points: 5,
                },
            ],
            overload_points: -10,
            reasonable_amount_points: 0,
            default_employment_years: Some(1.0),
            ..Self::canonical()
        }
    }

    pub fn preset(preset: PolicyPreset) -> Self {
        match preset {
            PolicyPreset::Canonical => Self::canonical(),
            PolicyPreset::Anonymous => Self::anonymous(),
            PolicyPreset::Client => Self::client(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Rejects policies that would break the score bounds or make a higher
    /// income / a lighter payment load score worse.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.bounds.min > self.bounds.max || self.bounds.max > 100 {
            return Err(PolicyError::InvalidBounds {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        if self.installment_term_months == 0 {
            return Err(PolicyError::ZeroInstallmentTerm);
        }
        if self.reasonable_amount_points < 0 {
            return Err(PolicyError::NegativeAmountBonus);
        }
        if self.bands.medium > self.bands.high {
            return Err(PolicyError::InvalidBands);
        }

        check_tiers("income_tiers", &self.income_tiers, true)?;
        check_tiers("credit_hint_tiers", &self.credit_hint_tiers, false)?;
        check_tiers("employment_tiers", &self.employment_tiers, false)?;

        let mut bands = self.load_bands.clone();
        bands.sort_by(|a, b| a.below.total_cmp(&b.below));
        if bands.iter().any(|band| !band.below.is_finite() || band.below <= 0.0) {
            return Err(PolicyError::NonMonotoneLoadBands);
        }
        let heavier_never_better = bands
            .windows(2)
            .all(|pair| pair[1].points <= pair[0].points)
            && bands
                .last()
                .map(|band| self.overload_points <= band.points)
                .unwrap_or(true);
        if !heavier_never_better {
            return Err(PolicyError::NonMonotoneLoadBands);
        }

        Ok(())
    }
}

fn check_tiers(name: &'static str, tiers: &[Tier], non_negative: bool) -> Result<(), PolicyError> {
    let mut sorted = tiers.to_vec();
    sorted.sort_by(|a, b| a.at_least.total_cmp(&b.at_least));

    let finite = sorted.iter().all(|tier| tier.at_least.is_finite());
    let ordered = sorted.windows(2).all(|pair| pair[1].points >= pair[0].points);
    let signs = !non_negative || sorted.iter().all(|tier| tier.points >= 0);

    if finite && ordered && signs {
        Ok(())
    } else {
        Err(PolicyError::NonMonotoneTiers(name))
    }
}

fn credit_hint_tiers() -> Vec<Tier> {
    vec![
        Tier {
            at_least: 40.0,
            points: 5,
        },
        Tier {
            at_least: 60.0,
            points: 15,
        },
        Tier {
            at_least: 80.0,
            points: 25,
        },
    ]
}

fn employment_tiers() -> Vec<Tier> {
    vec![
        Tier {
            at_least: 1.0,
            points: 5,
        },
        Tier {
            at_least: 3.0,
            points: 10,
        },
    ]
}

/// Named policy presets selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    Canonical,
    Anonymous,
    Client,
}

impl PolicyPreset {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "canonical" | "default" => Some(Self::Canonical),
            "anonymous" | "server" => Some(Self::Anonymous),
            "client" => Some(Self::Client),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PolicyPreset::Canonical => "canonical",
            PolicyPreset::Anonymous => "anonymous",
            PolicyPreset::Client => "client",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("score bounds {min}..={max} must be ordered and within 0..=100")]
    InvalidBounds { min: u8, max: u8 },
    #[error("installment term must be at least one month")]
    ZeroInstallmentTerm,
    #[error("requested-amount bonus must not be negative")]
    NegativeAmountBonus,
    #[error("medium band threshold must not exceed the high band threshold")]
    InvalidBands,
    #[error("{0} must award non-decreasing points for higher thresholds")]
    NonMonotoneTiers(&'static str),
    #[error("load bands must award non-increasing points for heavier loads")]
    NonMonotoneLoadBands,
    #[error("failed to read scoring policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring policy JSON: {0}")]
    Json(#[from] serde_json::Error),
}
