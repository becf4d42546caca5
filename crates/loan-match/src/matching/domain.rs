use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FOREX_MARGIN_PCT: f64 = 0.015;
/// Largest loan amount accepted for evaluation (one lakh crore rupees).
pub const MAX_LOAN_AMOUNT: f64 = 1e12;
pub const DEFAULT_STUDY_DURATION_MONTHS: u32 = 18;
pub const DEFAULT_REPAYMENT_TERM_MONTHS: NonZeroU32 = match NonZeroU32::new(84) {
    Some(term) => term,
    None => panic!("default repayment term must be non-zero"),
};

/// Numeric form field that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn parse(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(value) => *value,
            AmountInput::Text(raw) => raw.trim().replace(',', "").parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(raw) if raw.trim().is_empty())
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

/// Raw borrower form as submitted by the comparison page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerSubmission {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub loan_amount: Option<AmountInput>,
    #[serde(default)]
    pub has_collateral: bool,
    #[serde(default)]
    pub has_cosigner: bool,
    #[serde(default)]
    pub annual_family_income: Option<AmountInput>,
    #[serde(default)]
    pub intake: Option<String>,
}

/// Admission intake the borrower is applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intake {
    Feb,
    Jul,
}

impl Intake {
    pub fn label(&self) -> &'static str {
        match self {
            Intake::Feb => "Feb",
            Intake::Jul => "Jul",
        }
    }
}

/// Fields carried for display only. None of them influence scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerDetails {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
    pub annual_family_income: Option<f64>,
    pub intake: Option<Intake>,
}

/// Validated borrower inputs for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerProfile {
    pub loan_amount: f64,
    pub has_collateral: bool,
    pub has_cosigner: bool,
    pub details: BorrowerDetails,
}

impl BorrowerProfile {
    pub fn new(
        loan_amount: f64,
        has_collateral: bool,
        has_cosigner: bool,
    ) -> Result<Self, ProfileError> {
        if !loan_amount.is_finite() || loan_amount <= 0.0 {
            return Err(ProfileError::InvalidLoanAmount);
        }
        if loan_amount > MAX_LOAN_AMOUNT {
            return Err(ProfileError::LoanAmountAboveLimit);
        }

        Ok(Self {
            loan_amount,
            has_collateral,
            has_cosigner,
            details: BorrowerDetails::default(),
        })
    }

    pub fn from_submission(submission: BorrowerSubmission) -> Result<Self, ProfileError> {
        let loan_amount = submission
            .loan_amount
            .as_ref()
            .and_then(AmountInput::parse)
            .ok_or(ProfileError::InvalidLoanAmount)?;

        let annual_family_income = match submission.annual_family_income.as_ref() {
            None => None,
            Some(input) if input.is_blank() => None,
            Some(input) => {
                let income = input.parse().ok_or(ProfileError::InvalidIncome)?;
                if income < 0.0 {
                    return Err(ProfileError::NegativeIncome);
                }
                Some(income)
            }
        };

        let intake = match non_blank(submission.intake) {
            None => None,
            Some(raw) => Some(parse_intake(&raw)?),
        };

        let mut profile = Self::new(
            loan_amount,
            submission.has_collateral,
            submission.has_cosigner,
        )?;
        profile.details = BorrowerDetails {
            full_name: non_blank(submission.full_name),
            email: non_blank(submission.email),
            university: non_blank(submission.university),
            course: non_blank(submission.course),
            annual_family_income,
            intake,
        };

        Ok(profile)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_intake(raw: &str) -> Result<Intake, ProfileError> {
    match raw.to_ascii_lowercase().as_str() {
        "feb" | "february" => Ok(Intake::Feb),
        "jul" | "july" => Ok(Intake::Jul),
        _ => Err(ProfileError::UnknownIntake(raw.to_string())),
    }
}

/// Boundary validation failure for borrower input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("enter a valid positive loan amount")]
    InvalidLoanAmount,
    #[error("loan amount exceeds the supported maximum of ₹1,00,00,00,00,000")]
    LoanAmountAboveLimit,
    #[error("annual family income must be a number")]
    InvalidIncome,
    #[error("income cannot be negative")]
    NegativeIncome,
    #[error("intake '{0}' is not offered (expected Feb or Jul)")]
    UnknownIntake(String),
}

/// Ordering applied to the full result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortCriterion {
    #[default]
    #[serde(alias = "best")]
    BestMatch,
    #[serde(alias = "rate")]
    LowestRate,
    #[serde(alias = "speed")]
    FastestApproval,
}

impl SortCriterion {
    pub fn label(&self) -> &'static str {
        match self {
            SortCriterion::BestMatch => "Best Match",
            SortCriterion::LowestRate => "Interest Rate",
            SortCriterion::FastestApproval => "Approval Speed",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "best" | "bestmatch" => Ok(SortCriterion::BestMatch),
            "rate" | "lowestrate" => Ok(SortCriterion::LowestRate),
            "speed" | "fastestapproval" => Ok(SortCriterion::FastestApproval),
            _ => Err(format!(
                "unknown sort '{raw}' (expected best-match, lowest-rate or fastest-approval)"
            )),
        }
    }
}

/// Caller-adjustable knobs; anything left unset falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOverrides {
    #[serde(default)]
    pub forex_margin_pct: Option<f64>,
    #[serde(default)]
    pub study_duration_months: Option<u32>,
    #[serde(default)]
    pub repayment_term_months: Option<u32>,
    #[serde(default)]
    pub sort_criterion: Option<SortCriterion>,
}

/// Validated evaluation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationParameters {
    /// Fraction of principal, `0.015` meaning 1.5%.
    pub forex_margin_pct: f64,
    pub study_duration_months: u32,
    pub repayment_term_months: NonZeroU32,
    pub sort_criterion: SortCriterion,
}

impl Default for EvaluationParameters {
    fn default() -> Self {
        Self {
            forex_margin_pct: DEFAULT_FOREX_MARGIN_PCT,
            study_duration_months: DEFAULT_STUDY_DURATION_MONTHS,
            repayment_term_months: DEFAULT_REPAYMENT_TERM_MONTHS,
            sort_criterion: SortCriterion::default(),
        }
    }
}

impl EvaluationParameters {
    pub fn from_overrides(overrides: &ParameterOverrides) -> Result<Self, ParameterError> {
        let defaults = Self::default();

        let forex_margin_pct = overrides
            .forex_margin_pct
            .unwrap_or(defaults.forex_margin_pct);
        if !forex_margin_pct.is_finite() || !(0.0..=1.0).contains(&forex_margin_pct) {
            return Err(ParameterError::InvalidForexMargin(forex_margin_pct));
        }

        let repayment_term_months = match overrides.repayment_term_months {
            Some(months) => NonZeroU32::new(months).ok_or(ParameterError::ZeroRepaymentTerm)?,
            None => defaults.repayment_term_months,
        };

        Ok(Self {
            forex_margin_pct,
            study_duration_months: overrides
                .study_duration_months
                .unwrap_or(defaults.study_duration_months),
            repayment_term_months,
            sort_criterion: overrides
                .sort_criterion
                .unwrap_or(defaults.sort_criterion),
        })
    }

    pub fn with_sort(mut self, sort_criterion: SortCriterion) -> Self {
        self.sort_criterion = sort_criterion;
        self
    }
}

/// Boundary validation failure for evaluation parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("repayment term must be at least one month")]
    ZeroRepaymentTerm,
    #[error("forex margin {0} must be a fraction between 0 and 1")]
    InvalidForexMargin(f64),
}
