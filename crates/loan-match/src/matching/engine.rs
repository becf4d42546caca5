use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{LenderCatalog, LenderOffer};
use super::domain::{
    BorrowerProfile, BorrowerSubmission, EvaluationParameters, ParameterError,
    ParameterOverrides, ProfileError, SortCriterion,
};
use super::projection::CostProjection;
use super::ranking::{filter_eligible, rank, top_matches};
use super::scoring::{score, score_breakdown, Likelihood, ScoreComponent, SCORING_MODEL_VERSION};

/// Size of the highlighted "top matches" view.
pub const TOP_MATCH_COUNT: usize = 3;

/// Lender paired with its score and projections for one evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredOffer<'a> {
    pub lender: &'a LenderOffer,
    pub suitability_score: f64,
    pub likelihood: Likelihood,
    pub midpoint_rate: f64,
    pub projection: CostProjection,
    pub components: Vec<ScoreComponent>,
}

impl ScoredOffer<'_> {
    pub fn processing_fee(&self) -> f64 {
        self.projection.processing_fee
    }

    pub fn estimated_monthly_installment(&self) -> f64 {
        self.projection.estimated_monthly_installment
    }

    pub fn total_estimated_cost(&self) -> f64 {
        self.projection.total_estimated_cost
    }
}

pub fn score_offer<'a>(
    lender: &'a LenderOffer,
    profile: &BorrowerProfile,
    params: &EvaluationParameters,
) -> ScoredOffer<'a> {
    let suitability_score = score(lender, profile);
    ScoredOffer {
        lender,
        suitability_score,
        likelihood: Likelihood::from_score(suitability_score),
        midpoint_rate: lender.midpoint_rate(),
        projection: CostProjection::compute(lender, profile.loan_amount, params),
        components: score_breakdown(lender, profile),
    }
}

/// Outcome of one evaluation: the display-ordered list plus the best-match highlights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport<'a> {
    pub profile: BorrowerProfile,
    pub parameters: EvaluationParameters,
    pub scoring_model_version: u16,
    pub lenders_considered: usize,
    pub offers: Vec<ScoredOffer<'a>>,
    pub top_matches: Vec<ScoredOffer<'a>>,
}

impl MatchReport<'_> {
    /// True when no lender's ceiling accommodates the request.
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

/// Filters, scores, ranks and projects `lenders` for one borrower.
///
/// Callers validate `profile` and `params` beforehand; see [`MatchRequest::validate`].
pub fn evaluate<'a>(
    lenders: &'a [LenderOffer],
    profile: &BorrowerProfile,
    params: &EvaluationParameters,
) -> MatchReport<'a> {
    debug_assert!(
        profile.loan_amount.is_finite() && profile.loan_amount > 0.0,
        "loan amount must be validated before evaluation"
    );

    let scored: Vec<ScoredOffer<'a>> = filter_eligible(lenders, profile.loan_amount)
        .into_iter()
        .map(|lender| score_offer(lender, profile, params))
        .collect();

    let best = rank(&scored, SortCriterion::BestMatch);
    let top = top_matches(&best, TOP_MATCH_COUNT);
    let offers = match params.sort_criterion {
        SortCriterion::BestMatch => best,
        criterion => rank(&best, criterion),
    };

    debug!(
        considered = lenders.len(),
        eligible = offers.len(),
        sort = %params.sort_criterion,
        "evaluated lender matches"
    );

    MatchReport {
        profile: profile.clone(),
        parameters: *params,
        scoring_model_version: SCORING_MODEL_VERSION,
        lenders_considered: lenders.len(),
        offers,
        top_matches: top,
    }
}

/// Holds the shared, read-only catalog. Evaluations never mutate it.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    catalog: Arc<LenderCatalog>,
}

impl MatchingEngine {
    pub fn new(catalog: LenderCatalog) -> Self {
        Self::from_shared(Arc::new(catalog))
    }

    pub fn from_shared(catalog: Arc<LenderCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &LenderCatalog {
        &self.catalog
    }

    pub fn evaluate(
        &self,
        profile: &BorrowerProfile,
        params: &EvaluationParameters,
    ) -> MatchReport<'_> {
        evaluate(self.catalog.lenders(), profile, params)
    }

    /// Validates a raw request at the boundary, then evaluates it.
    pub fn evaluate_request(
        &self,
        request: MatchRequest,
    ) -> Result<MatchReport<'_>, MatchRequestError> {
        let (profile, params) = request.validate()?;
        Ok(self.evaluate(&profile, &params))
    }
}

/// Wire form of a match request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub borrower: BorrowerSubmission,
    #[serde(default)]
    pub parameters: ParameterOverrides,
}

impl MatchRequest {
    pub fn validate(self) -> Result<(BorrowerProfile, EvaluationParameters), MatchRequestError> {
        let profile = BorrowerProfile::from_submission(self.borrower)?;
        let params = EvaluationParameters::from_overrides(&self.parameters)?;
        Ok((profile, params))
    }
}

/// Boundary validation failure; no partial evaluation is attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchRequestError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
}
