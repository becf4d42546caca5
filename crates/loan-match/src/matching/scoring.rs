use serde::{Deserialize, Serialize};

use super::catalog::LenderOffer;
use super::domain::BorrowerProfile;

/// Bump whenever a weight or a likelihood cutoff changes; the two are calibrated together.
pub const SCORING_MODEL_VERSION: u16 = 1;

const RATE_CEILING_PCT: f64 = 14.0;
const RATE_WEIGHT: f64 = 10.0;
const APPROVAL_CEILING_DAYS: u32 = 10;
const APPROVAL_WEIGHT: f64 = 3.0;
const SECURED_FIT_BONUS: f64 = 15.0;
const UNSECURED_FIT_BONUS: f64 = 20.0;
const COSIGNER_BONUS: f64 = 5.0;
const HEADROOM_BONUS: f64 = 10.0;

const HIGH_LIKELIHOOD_CUTOFF: f64 = 85.0;
const MEDIUM_LIKELIHOOD_CUTOFF: f64 = 65.0;

/// Scoring factor a component is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    InterestRate,
    ApprovalSpeed,
    CollateralFit,
    CosignerFit,
    LoanHeadroom,
}

/// Discrete contribution to a suitability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Coarse approval-likelihood band derived from the suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_LIKELIHOOD_CUTOFF {
            Likelihood::High
        } else if score >= MEDIUM_LIKELIHOOD_CUTOFF {
            Likelihood::Medium
        } else {
            Likelihood::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Likelihood::High => "High",
            Likelihood::Medium => "Medium",
            Likelihood::Low => "Low",
        }
    }
}

fn rate_points(midpoint: f64) -> f64 {
    (RATE_CEILING_PCT - midpoint.min(RATE_CEILING_PCT)) * RATE_WEIGHT
}

fn speed_points(approval_days: u32) -> f64 {
    f64::from(APPROVAL_CEILING_DAYS - approval_days.min(APPROVAL_CEILING_DAYS)) * APPROVAL_WEIGHT
}

fn collateral_points(lender: &LenderOffer, profile: &BorrowerProfile) -> f64 {
    match (profile.has_collateral, lender.requires_collateral) {
        (true, true) => SECURED_FIT_BONUS,
        (false, false) => UNSECURED_FIT_BONUS,
        _ => 0.0,
    }
}

fn cosigner_points(lender: &LenderOffer, profile: &BorrowerProfile) -> f64 {
    if profile.has_cosigner && lender.allows_cosigner {
        COSIGNER_BONUS
    } else {
        0.0
    }
}

fn headroom_points(lender: &LenderOffer, profile: &BorrowerProfile) -> f64 {
    // Always awarded once the ceiling filter has run.
    if lender.accommodates(profile.loan_amount) {
        HEADROOM_BONUS
    } else {
        0.0
    }
}

/// Relative suitability of `lender` for `profile`. Higher is better; the scale has no unit.
pub fn score(lender: &LenderOffer, profile: &BorrowerProfile) -> f64 {
    let mut total = 0.0;
    total += rate_points(lender.midpoint_rate());
    total += speed_points(lender.approval_days);
    total += collateral_points(lender, profile);
    total += cosigner_points(lender, profile);
    total += headroom_points(lender, profile);
    total
}

/// Per-factor view of [`score`] for audits and UI explanations.
pub fn score_breakdown(lender: &LenderOffer, profile: &BorrowerProfile) -> Vec<ScoreComponent> {
    let midpoint = lender.midpoint_rate();
    let mut components = vec![
        ScoreComponent {
            factor: ScoreFactor::InterestRate,
            points: rate_points(midpoint),
            notes: format!("midpoint rate {midpoint:.2}% against a {RATE_CEILING_PCT:.0}% ceiling"),
        },
        ScoreComponent {
            factor: ScoreFactor::ApprovalSpeed,
            points: speed_points(lender.approval_days),
            notes: format!(
                "approval in {} day(s) against a {APPROVAL_CEILING_DAYS} day ceiling",
                lender.approval_days
            ),
        },
    ];

    let collateral = collateral_points(lender, profile);
    if collateral > 0.0 {
        let notes = if lender.requires_collateral {
            "borrower can pledge the collateral this lender requires"
        } else {
            "unsecured product available to a borrower without collateral"
        };
        components.push(ScoreComponent {
            factor: ScoreFactor::CollateralFit,
            points: collateral,
            notes: notes.to_string(),
        });
    }

    let cosigner = cosigner_points(lender, profile);
    if cosigner > 0.0 {
        components.push(ScoreComponent {
            factor: ScoreFactor::CosignerFit,
            points: cosigner,
            notes: "lender accepts the borrower's co-signer".to_string(),
        });
    }

    let headroom = headroom_points(lender, profile);
    if headroom > 0.0 {
        components.push(ScoreComponent {
            factor: ScoreFactor::LoanHeadroom,
            points: headroom,
            notes: format!(
                "requested amount within the {:.0} ceiling",
                lender.max_loan_amount
            ),
        });
    }

    components
}
