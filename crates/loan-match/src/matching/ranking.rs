use std::cmp::Ordering;

use super::catalog::LenderOffer;
use super::domain::SortCriterion;
use super::engine::ScoredOffer;

/// Lenders whose ceiling accommodates `loan_amount`, in catalog order.
pub fn filter_eligible(lenders: &[LenderOffer], loan_amount: f64) -> Vec<&LenderOffer> {
    lenders
        .iter()
        .filter(|lender| lender.accommodates(loan_amount))
        .collect()
}

fn compare(criterion: SortCriterion, a: &ScoredOffer<'_>, b: &ScoredOffer<'_>) -> Ordering {
    match criterion {
        SortCriterion::BestMatch => b.suitability_score.total_cmp(&a.suitability_score),
        SortCriterion::LowestRate => a.midpoint_rate.total_cmp(&b.midpoint_rate),
        SortCriterion::FastestApproval => a.lender.approval_days.cmp(&b.lender.approval_days),
    }
}

/// Stable ordering: entries with equal keys keep their input order.
pub fn rank<'a>(scored: &[ScoredOffer<'a>], criterion: SortCriterion) -> Vec<ScoredOffer<'a>> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| compare(criterion, a, b));
    ranked
}

/// First `count` entries of the best-match ordering, whatever the display sort.
pub fn top_matches<'a>(scored: &[ScoredOffer<'a>], count: usize) -> Vec<ScoredOffer<'a>> {
    let mut best = rank(scored, SortCriterion::BestMatch);
    best.truncate(count);
    best
}
