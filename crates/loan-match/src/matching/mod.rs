//! Lender matching: catalog loading, eligibility filtering, suitability scoring, ranking and
//! cost projection for student-loan borrowers.
//!
//! The filter, scorer, ranker and projections are free functions over explicit inputs.
//! [`MatchingEngine`] only carries the shared catalog so request handlers can reach it.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod projection;
pub mod ranking;
pub mod router;
pub mod scoring;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{
    load_catalog, CatalogError, InstitutionType, LenderCatalog, LenderId, LenderOffer, RateRange,
};
pub use domain::{
    AmountInput, BorrowerDetails, BorrowerProfile, BorrowerSubmission, EvaluationParameters,
    Intake, ParameterError, ParameterOverrides, ProfileError, SortCriterion,
};
pub use engine::{
    evaluate, score_offer, MatchReport, MatchRequest, MatchRequestError, MatchingEngine,
    ScoredOffer, TOP_MATCH_COUNT,
};
pub use projection::{
    interest_during_study, monthly_installment, processing_fee, total_estimated_cost,
    total_interest_over_term, total_repayment, CostProjection,
};
pub use ranking::{filter_eligible, rank, top_matches};
pub use router::matching_router;
pub use scoring::{
    score, score_breakdown, Likelihood, ScoreComponent, ScoreFactor, SCORING_MODEL_VERSION,
};
pub use views::{
    format_inr, format_percent, round_currency, MatchReportView, MatchStatus, OfferView,
    ParametersView,
};
