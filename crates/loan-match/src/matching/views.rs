use serde::Serialize;

use super::domain::{EvaluationParameters, SortCriterion};
use super::engine::{MatchReport, ScoredOffer};
use super::scoring::Likelihood;

/// Rounds a monetary figure to whole currency units for presentation.
pub fn round_currency(amount: f64) -> i64 {
    amount.round() as i64
}

/// Whole-rupee amount with Indian digit grouping, e.g. `₹20,00,000`.
pub fn format_inr(amount: f64) -> String {
    let rounded = round_currency(amount);
    let grouped = group_indian_digits(&rounded.unsigned_abs().to_string());
    if rounded < 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

fn group_indian_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Percentage with at most two decimals and no trailing zeros, e.g. `10.25%` or `9%`.
pub fn format_percent(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoMatches,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub lender_id: String,
    pub name: String,
    pub institution_type: &'static str,
    pub midpoint_rate: f64,
    pub rate_label: String,
    pub rate_range_label: String,
    pub processing_fee: i64,
    pub processing_fee_label: String,
    pub processing_fee_pct_label: String,
    pub requires_collateral: bool,
    pub collateral_label: &'static str,
    pub allows_cosigner: bool,
    pub approval_days: u32,
    pub moratorium_months: u32,
    pub estimated_monthly_installment: i64,
    pub estimated_monthly_installment_label: String,
    pub total_estimated_cost: i64,
    pub total_estimated_cost_label: String,
    pub suitability_score: f64,
    pub likelihood: Likelihood,
    pub likelihood_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl From<&ScoredOffer<'_>> for OfferView {
    fn from(offer: &ScoredOffer<'_>) -> Self {
        let lender = offer.lender;
        Self {
            lender_id: lender.id.0.clone(),
            name: lender.name.clone(),
            institution_type: lender.institution_type.label(),
            midpoint_rate: offer.midpoint_rate,
            rate_label: format_percent(offer.midpoint_rate),
            rate_range_label: format!(
                "{} - {}",
                format_percent(lender.rate_range.min_annual_pct),
                format_percent(lender.rate_range.max_annual_pct)
            ),
            processing_fee: round_currency(offer.processing_fee()),
            processing_fee_label: format_inr(offer.processing_fee()),
            processing_fee_pct_label: format!("({:.1}%)", lender.processing_fee_pct * 100.0),
            requires_collateral: lender.requires_collateral,
            collateral_label: if lender.requires_collateral {
                "Required"
            } else {
                "Not Required"
            },
            allows_cosigner: lender.allows_cosigner,
            approval_days: lender.approval_days,
            moratorium_months: lender.moratorium_months,
            estimated_monthly_installment: round_currency(offer.estimated_monthly_installment()),
            estimated_monthly_installment_label: format_inr(offer.estimated_monthly_installment()),
            total_estimated_cost: round_currency(offer.total_estimated_cost()),
            total_estimated_cost_label: format_inr(offer.total_estimated_cost()),
            suitability_score: offer.suitability_score,
            likelihood: offer.likelihood,
            likelihood_label: offer.likelihood.label(),
            notes: lender.notes.clone(),
        }
    }
}

/// Evaluation parameters echoed back with a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParametersView {
    pub forex_margin_pct: f64,
    pub study_duration_months: u32,
    pub repayment_term_months: u32,
    pub sort_criterion: SortCriterion,
}

impl From<&EvaluationParameters> for ParametersView {
    fn from(params: &EvaluationParameters) -> Self {
        Self {
            forex_margin_pct: params.forex_margin_pct,
            study_duration_months: params.study_duration_months,
            repayment_term_months: params.repayment_term_months.get(),
            sort_criterion: params.sort_criterion,
        }
    }
}

/// Presentation form of a [`MatchReport`]; all money is in whole currency units.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReportView {
    pub status: MatchStatus,
    pub loan_amount: i64,
    pub loan_amount_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intake: Option<&'static str>,
    pub parameters: ParametersView,
    pub sort_label: &'static str,
    pub scoring_model_version: u16,
    pub lenders_considered: usize,
    pub eligible_count: usize,
    pub top_matches: Vec<OfferView>,
    pub offers: Vec<OfferView>,
}

impl From<&MatchReport<'_>> for MatchReportView {
    fn from(report: &MatchReport<'_>) -> Self {
        let status = if report.is_empty() {
            MatchStatus::NoMatches
        } else {
            MatchStatus::Matched
        };

        Self {
            status,
            loan_amount: round_currency(report.profile.loan_amount),
            loan_amount_label: format_inr(report.profile.loan_amount),
            university: report.profile.details.university.clone(),
            intake: report.profile.details.intake.map(|intake| intake.label()),
            parameters: ParametersView::from(&report.parameters),
            sort_label: report.parameters.sort_criterion.label(),
            scoring_model_version: report.scoring_model_version,
            lenders_considered: report.lenders_considered,
            eligible_count: report.offers.len(),
            top_matches: report.top_matches.iter().map(OfferView::from).collect(),
            offers: report.offers.iter().map(OfferView::from).collect(),
        }
    }
}
