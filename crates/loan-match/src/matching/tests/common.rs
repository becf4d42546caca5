use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::matching::catalog::{InstitutionType, LenderCatalog, LenderId, LenderOffer, RateRange};
use crate::matching::domain::{AmountInput, BorrowerProfile, BorrowerSubmission};
use crate::matching::engine::{MatchRequest, MatchingEngine};
use crate::matching::router::matching_router;

pub(super) fn offer(id: &str, rate: (f64, f64), max_loan_amount: f64) -> LenderOffer {
    LenderOffer {
        id: LenderId(id.to_string()),
        name: id.replace('-', " "),
        institution_type: InstitutionType::Bank,
        rate_range: RateRange::new(rate.0, rate.1),
        processing_fee_flat: 10_000.0,
        processing_fee_pct: 0.01,
        requires_collateral: false,
        allows_cosigner: true,
        approval_days: 7,
        moratorium_months: 6,
        max_loan_amount,
        notes: Vec::new(),
    }
}

pub(super) fn bundled_catalog() -> LenderCatalog {
    LenderCatalog::bundled().expect("bundled catalog is valid")
}

pub(super) fn engine() -> MatchingEngine {
    MatchingEngine::new(bundled_catalog())
}

pub(super) fn unsecured_profile(loan_amount: f64) -> BorrowerProfile {
    BorrowerProfile::new(loan_amount, false, false).expect("valid profile")
}

pub(super) fn request(loan_amount: f64) -> MatchRequest {
    MatchRequest {
        borrower: BorrowerSubmission {
            full_name: Some("Riya Menon".to_string()),
            university: Some("University of Toronto".to_string()),
            loan_amount: Some(AmountInput::Number(loan_amount)),
            intake: Some("Feb".to_string()),
            ..BorrowerSubmission::default()
        },
        ..MatchRequest::default()
    }
}

pub(super) fn router() -> axum::Router {
    matching_router(Arc::new(engine()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
