//! Borrower-facing cost estimates. Amounts are unrounded; rounding happens in the views.

use std::num::NonZeroU32;

use serde::Serialize;

use super::catalog::LenderOffer;
use super::domain::EvaluationParameters;

/// Upfront fee: the larger of the flat fee and the percentage of principal.
pub fn processing_fee(lender: &LenderOffer, loan_amount: f64) -> f64 {
    lender
        .processing_fee_flat
        .max(loan_amount * lender.processing_fee_pct)
}

/// Simple (non-compounded) monthly accrual across study plus moratorium months.
pub fn interest_during_study(lender: &LenderOffer, loan_amount: f64, study_months: u32) -> f64 {
    let monthly_rate = lender.midpoint_rate() / 100.0 / 12.0;
    let accrual_months = f64::from(study_months) + f64::from(lender.moratorium_months);
    loan_amount * monthly_rate * accrual_months
}

pub fn total_estimated_cost(
    lender: &LenderOffer,
    loan_amount: f64,
    params: &EvaluationParameters,
) -> f64 {
    loan_amount
        + interest_during_study(lender, loan_amount, params.study_duration_months)
        + processing_fee(lender, loan_amount)
        + loan_amount * params.forex_margin_pct
}

/// Equated monthly installment under standard amortization.
///
/// `EMI = P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r = annual_rate_pct / 12 / 100`.
/// A zero periodic rate degenerates to `P / n`.
pub fn monthly_installment(principal: f64, annual_rate_pct: f64, term_months: NonZeroU32) -> f64 {
    let months = f64::from(term_months.get());
    let rate = annual_rate_pct / 12.0 / 100.0;
    if rate == 0.0 {
        return principal / months;
    }

    let growth = (1.0 + rate).powf(months);
    principal * rate * growth / (growth - 1.0)
}

/// Sum of all installments over the repayment term.
pub fn total_repayment(principal: f64, annual_rate_pct: f64, term_months: NonZeroU32) -> f64 {
    monthly_installment(principal, annual_rate_pct, term_months) * f64::from(term_months.get())
}

pub fn total_interest_over_term(
    principal: f64,
    annual_rate_pct: f64,
    term_months: NonZeroU32,
) -> f64 {
    total_repayment(principal, annual_rate_pct, term_months) - principal
}

/// All projections for one lender, computed together so callers never mix parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostProjection {
    pub processing_fee: f64,
    pub interest_during_study: f64,
    pub forex_margin: f64,
    pub total_estimated_cost: f64,
    pub estimated_monthly_installment: f64,
}

impl CostProjection {
    pub fn compute(lender: &LenderOffer, loan_amount: f64, params: &EvaluationParameters) -> Self {
        Self {
            processing_fee: processing_fee(lender, loan_amount),
            interest_during_study: interest_during_study(
                lender,
                loan_amount,
                params.study_duration_months,
            ),
            forex_margin: loan_amount * params.forex_margin_pct,
            total_estimated_cost: total_estimated_cost(lender, loan_amount, params),
            estimated_monthly_installment: monthly_installment(
                loan_amount,
                lender.midpoint_rate(),
                params.repayment_term_months,
            ),
        }
    }
}
