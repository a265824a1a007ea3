//! Multi-step onboarding wizard collecting the applicant profile.

use serde::{Deserialize, Serialize};

use crate::catalog::{ProductType, ProfilePatch, UserProfile};
use crate::scoring::ApplicantProfile;

/// Wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    ProductType,
    Amount,
    Purpose,
    Profile,
    Result,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 5] = [
        OnboardingStep::ProductType,
        OnboardingStep::Amount,
        OnboardingStep::Purpose,
        OnboardingStep::Profile,
        OnboardingStep::Result,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    /// Step at `index`, clamped to the last step.
    pub fn at(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub const fn title(self) -> &'static str {
        match self {
            OnboardingStep::ProductType => "Тип продукта",
            OnboardingStep::Amount => "Сумма",
            OnboardingStep::Purpose => "Цель",
            OnboardingStep::Profile => "Профиль",
            OnboardingStep::Result => "Готово",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            OnboardingStep::ProductType => "Что вам нужно?",
            OnboardingStep::Amount => "Сколько хотите?",
            OnboardingStep::Purpose => "На что потратите?",
            OnboardingStep::Profile => "О вас",
            OnboardingStep::Result => "Ваш результат",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanPurpose {
    Purchase,
    Renovation,
    Car,
    Vacation,
    Education,
    Medical,
    DebtConsolidation,
    Other,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 8] = [
        LoanPurpose::Purchase,
        LoanPurpose::Renovation,
        LoanPurpose::Car,
        LoanPurpose::Vacation,
        LoanPurpose::Education,
        LoanPurpose::Medical,
        LoanPurpose::DebtConsolidation,
        LoanPurpose::Other,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.code() == value.trim())
    }

    pub const fn code(self) -> &'static str {
        match self {
            LoanPurpose::Purchase => "purchase",
            LoanPurpose::Renovation => "renovation",
            LoanPurpose::Car => "car",
            LoanPurpose::Vacation => "vacation",
            LoanPurpose::Education => "education",
            LoanPurpose::Medical => "medical",
            LoanPurpose::DebtConsolidation => "debt-consolidation",
            LoanPurpose::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoanPurpose::Purchase => "Покупка техники/мебели",
            LoanPurpose::Renovation => "Ремонт",
            LoanPurpose::Car => "Покупка автомобиля",
            LoanPurpose::Vacation => "Отпуск",
            LoanPurpose::Education => "Обучение",
            LoanPurpose::Medical => "Лечение",
            LoanPurpose::DebtConsolidation => "Рефинансирование",
            LoanPurpose::Other => "Другое",
        }
    }
}

/// Obligation the applicant already pays every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingLoan {
    pub name: String,
    pub monthly_payment: f64,
}

/// Data gathered so far; defaults match the wizard's initial slider positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    pub product_type: ProductType,
    pub amount: f64,
    pub purpose: Option<LoanPurpose>,
    pub other_purpose: Option<String>,
    pub income: f64,
    pub expenses: f64,
    pub existing_loans: Vec<ExistingLoan>,
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self {
            product_type: ProductType::Loan,
            amount: 300_000.0,
            purpose: None,
            other_purpose: None,
            income: 80_000.0,
            expenses: 40_000.0,
            existing_loans: Vec::new(),
        }
    }
}

impl OnboardingDraft {
    /// Pre-fills income, expenses, and obligations from a signed-in user.
    pub fn prefill_from(&mut self, user: &UserProfile) {
        if let Some(income) = user.monthly_income {
            self.income = income;
        }
        if let Some(expenses) = user.monthly_expenses {
            self.expenses = expenses;
        }
        if let Some(payments) = user.total_monthly_payments.filter(|p| *p > 0.0) {
            if self.existing_loans.is_empty() {
                self.existing_loans.push(ExistingLoan {
                    name: "Кредит".to_string(),
                    monthly_payment: payments,
                });
            }
        }
    }

    pub fn total_monthly_payments(&self) -> f64 {
        self.existing_loans
            .iter()
            .map(|loan| loan.monthly_payment.max(0.0))
            .fold(0.0, |total, payment| total + payment)
    }

    /// Slider granularity for the amount step.
    pub fn amount_step(&self) -> f64 {
        match self.product_type {
            ProductType::Microloan => 1_000.0,
            ProductType::Card | ProductType::Loan => 10_000.0,
        }
    }

    pub fn applicant_profile(&self) -> ApplicantProfile {
        ApplicantProfile::new(self.income, self.amount, self.total_monthly_payments())
            .with_expenses(self.expenses)
            .with_product_type(self.product_type)
    }

    pub fn profile_patch(&self) -> ProfilePatch {
        ProfilePatch {
            monthly_income: Some(self.income),
            monthly_expenses: Some(self.expenses),
            total_monthly_payments: Some(self.total_monthly_payments()),
        }
    }

    /// Query string for the results page.
    pub fn results_query(&self) -> String {
        format!(
            "type={}&amount={}&income={}&expenses={}&totalMonthlyPayments={}",
            self.product_type.code(),
            self.amount,
            self.income,
            self.expenses,
            self.total_monthly_payments()
        )
    }
}

/// Wizard position plus draft.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnboardingWizard {
    step: usize,
    pub draft: OnboardingDraft,
}

impl OnboardingWizard {
    pub fn new(draft: OnboardingDraft) -> Self {
        Self { step: 0, draft }
    }

    pub fn at_step(step: usize, draft: OnboardingDraft) -> Self {
        Self {
            step: OnboardingStep::at(step).index(),
            draft,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        OnboardingStep::at(self.step)
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 == OnboardingStep::ALL.len()
    }

    /// Advances one step; returns false when already on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.step += 1;
        true
    }

    /// Goes back one step; returns false when already on the first step.
    pub fn back(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.step -= 1;
        true
    }
}

/// Parses the compact `name:payment;name:payment` form encoding of existing
/// loans. Entries without a usable payment are dropped.
pub fn parse_existing_loans(raw: &str) -> Vec<ExistingLoan> {
    raw.split(';')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let (name, payment) = match entry.rsplit_once(':') {
                Some((name, payment)) => (name.trim(), payment),
                None => ("", entry),
            };
            let monthly_payment = payment.trim().parse::<f64>().ok()?;
            if !monthly_payment.is_finite() || monthly_payment <= 0.0 {
                return None;
            }
            Some(ExistingLoan {
                name: if name.is_empty() {
                    "Кредит".to_string()
                } else {
                    name.to_string()
                },
                monthly_payment,
            })
        })
        .collect()
}

pub fn encode_existing_loans(loans: &[ExistingLoan]) -> String {
    loans
        .iter()
        .map(|loan| format!("{}:{}", loan.name.replace([':', ';'], " "), loan.monthly_payment))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_moves_within_bounds() {
        let mut wizard = OnboardingWizard::default();
        assert_eq!(wizard.step(), OnboardingStep::ProductType);
        assert!(!wizard.back());

        for _ in 0..4 {
            assert!(wizard.next());
        }
        assert_eq!(wizard.step(), OnboardingStep::Result);
        assert!(wizard.is_last());
        assert!(!wizard.next());

        assert!(wizard.back());
        assert_eq!(wizard.step(), OnboardingStep::Profile);
    }

    #[test]
    fn at_step_clamps_out_of_range_index() {
        let wizard = OnboardingWizard::at_step(42, OnboardingDraft::default());
        assert_eq!(wizard.step(), OnboardingStep::Result);
    }

    #[test]
    fn draft_sums_existing_loans_into_profile() {
        let mut draft = OnboardingDraft::default();
        draft.existing_loans = parse_existing_loans("Ипотека:25000; Карта:5000;broken:x");

        assert_eq!(draft.existing_loans.len(), 2);
        assert_eq!(draft.total_monthly_payments(), 30_000.0);

        let profile = draft.applicant_profile();
        assert_eq!(profile.existing_monthly_payments, Some(30_000.0));
        assert_eq!(profile.requested_amount, Some(300_000.0));
        assert_eq!(profile.product_type, Some(ProductType::Loan));
    }

    #[test]
    fn microloans_use_finer_amount_step() {
        let mut draft = OnboardingDraft::default();
        assert_eq!(draft.amount_step(), 10_000.0);
        draft.product_type = ProductType::Microloan;
        assert_eq!(draft.amount_step(), 1_000.0);
    }

    #[test]
    fn results_query_carries_monthly_payments() {
        let mut draft = OnboardingDraft::default();
        draft.existing_loans.push(ExistingLoan {
            name: "Авто".to_string(),
            monthly_payment: 12_000.0,
        });

        assert_eq!(
            draft.results_query(),
            "type=loan&amount=300000&income=80000&expenses=40000&totalMonthlyPayments=12000"
        );
    }

    #[test]
    fn no_existing_loans_sum_to_positive_zero() {
        let draft = OnboardingDraft::default();
        assert!(draft.total_monthly_payments().is_sign_positive());
        assert!(draft.results_query().ends_with("&totalMonthlyPayments=0"));
    }

    #[test]
    fn prefill_uses_user_profile_values() {
        let user = UserProfile {
            id: "u-7".to_string(),
            monthly_income: Some(120_000.0),
            monthly_expenses: Some(50_000.0),
            total_monthly_payments: Some(9_000.0),
            ..UserProfile::default()
        };

        let mut draft = OnboardingDraft::default();
        draft.prefill_from(&user);

        assert_eq!(draft.income, 120_000.0);
        assert_eq!(draft.expenses, 50_000.0);
        assert_eq!(draft.total_monthly_payments(), 9_000.0);
    }

    #[test]
    fn loans_round_trip_through_form_encoding() {
        let loans = vec![ExistingLoan {
            name: "Карта".to_string(),
            monthly_payment: 4_500.0,
        }];
        assert_eq!(parse_existing_loans(&encode_existing_loans(&loans)), loans);
    }
}
