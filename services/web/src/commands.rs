use clap::Args;
use credium::batch::{score_csv, write_csv};
use credium::catalog::ProductType;
use credium::config::AppConfig;
use credium::error::AppError;
use credium::format::{format_percent, rubles};
use credium::scoring::{ApplicantProfile, PolicyPreset, ScoreEstimator, ScoringPolicy};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use crate::routes::EstimateResponse;

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PolicyArgs {
    /// Scoring policy preset (canonical, anonymous, client). Defaults to SCORING_POLICY.
    #[arg(long, value_parser = parse_preset)]
    pub(crate) policy: Option<PolicyPreset>,
    /// JSON policy file overriding the preset
    #[arg(long)]
    pub(crate) policy_file: Option<PathBuf>,
}

impl PolicyArgs {
    fn estimator(&self) -> Result<ScoreEstimator, AppError> {
        let policy = match (&self.policy_file, self.policy) {
            (Some(path), _) => ScoringPolicy::from_path(path)
                .map_err(|err| AppError::BadRequest(err.to_string()))?,
            (None, Some(preset)) => ScoringPolicy::preset(preset),
            (None, None) => AppConfig::load()?.scoring.resolve()?,
        };
        Ok(ScoreEstimator::new(policy))
    }
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Monthly income
    #[arg(long)]
    pub(crate) income: f64,
    /// Requested amount
    #[arg(long, default_value_t = 0.0)]
    pub(crate) amount: f64,
    /// Existing monthly loan payments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) payments: f64,
    /// Monthly expenses
    #[arg(long)]
    pub(crate) expenses: Option<f64>,
    /// Credit score hint on a 0-100 scale
    #[arg(long)]
    pub(crate) credit_score: Option<f64>,
    /// Years with the current employer
    #[arg(long)]
    pub(crate) employment_years: Option<f64>,
    /// Product type (card, loan, microloan)
    #[arg(long = "type", value_parser = parse_product_type)]
    pub(crate) product_type: Option<ProductType>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) policy: PolicyArgs,
}

impl EstimateArgs {
    fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            income: Some(self.income),
            expenses: self.expenses,
            existing_monthly_payments: Some(self.payments),
            requested_amount: Some(self.amount),
            credit_score_hint: self.credit_score,
            employment_years: self.employment_years,
            product_type: self.product_type,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with columns id, income, amount, expenses, totalMonthlyPayments, creditScore, employmentYears, type
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Write scored rows here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) policy: PolicyArgs,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let estimator = args.policy.estimator()?;
    let profile = args.profile();
    let result = estimator.estimate(&profile);

    if args.json {
        let response = EstimateResponse::from(result);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Approval estimate");
    println!(
        "  Income {} | requested {} | existing payments {}",
        rubles(args.income),
        rubles(args.amount),
        rubles(args.payments)
    );
    println!("  Score: {} ({})", result.score, result.band.label());
    println!(
        "  Debt-to-income: {}",
        format_percent(result.debt_to_income_ratio, 1)
    );

    println!("\nScore components");
    for component in &result.components {
        println!(
            "  {:>+4}  {:?}: {}",
            component.points, component.factor, component.notes
        );
    }

    println!("\nWhat helps");
    for message in result.explanation_messages() {
        println!("  - {message}");
    }
    println!("\nSuggestions");
    for message in result.suggestion_messages() {
        println!("  - {message}");
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let estimator = args.policy.estimator()?;
    let reader = BufReader::new(File::open(&args.input)?);
    let estimates = score_csv(reader, &estimator)?;

    match &args.output {
        Some(path) => {
            write_csv(BufWriter::new(File::create(path)?), &estimates)?;
            println!(
                "Scored {} applicant(s) from {} into {}",
                estimates.len(),
                args.input.display(),
                path.display()
            );
        }
        None => write_csv(io::stdout().lock(), &estimates)?,
    }

    Ok(())
}

fn parse_preset(raw: &str) -> Result<PolicyPreset, String> {
    PolicyPreset::parse(raw)
        .ok_or_else(|| format!("unknown policy '{raw}' (expected canonical, anonymous or client)"))
}

fn parse_product_type(raw: &str) -> Result<ProductType, String> {
    ProductType::parse(raw)
        .ok_or_else(|| format!("unknown product type '{raw}' (expected card, loan or microloan)"))
}
