use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::catalog::LenderOffer;
use super::engine::{MatchRequest, MatchingEngine};
use super::views::MatchReportView;

/// Router exposing lender matching and the catalog listing.
pub fn matching_router(engine: Arc<MatchingEngine>) -> Router {
    Router::new()
        .route("/api/v1/loans/matches", post(match_handler))
        .route("/api/v1/lenders", get(lenders_handler))
        .with_state(engine)
}

pub(crate) async fn match_handler(
    State(engine): State<Arc<MatchingEngine>>,
    Json(request): Json<MatchRequest>,
) -> Response {
    match engine.evaluate_request(request) {
        Ok(report) => {
            let view = MatchReportView::from(&report);
            info!(
                eligible = view.eligible_count,
                considered = view.lenders_considered,
                "served lender matches"
            );
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => {
            warn!(%error, "rejected match request");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LenderListView<'a> {
    pub(crate) count: usize,
    pub(crate) lenders: &'a [LenderOffer],
}

pub(crate) async fn lenders_handler(State(engine): State<Arc<MatchingEngine>>) -> Response {
    let lenders = engine.catalog().lenders();
    let view = LenderListView {
        count: lenders.len(),
        lenders,
    };
    (StatusCode::OK, Json(view)).into_response()
}
