use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::documents::{DocumentCheck, DocumentCheckRequest};
use super::domain::{LeadId, WaitlistSubmission};
use super::repository::{LeadNotifier, LeadRepository, RepositoryError};
use super::service::{LeadServiceError, WaitlistService};

/// Router exposing waitlist sign-up, lead status and the document checklist.
pub fn intake_router<R, N>(service: Arc<WaitlistService<R, N>>) -> Router
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    Router::new()
        .route("/api/v1/waitlist", post(submit_handler::<R, N>))
        .route("/api/v1/waitlist/:lead_id", get(status_handler::<R, N>))
        .route("/api/v1/documents/check", post(document_check_handler))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<WaitlistService<R, N>>>,
    Json(submission): Json<WaitlistSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(LeadServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(LeadServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "email is already on the waitlist",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => {
            warn!(error = %other, "waitlist submission failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<WaitlistService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    let id = LeadId(lead_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(LeadServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("lead {} not found", id.0),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn document_check_handler(
    Json(request): Json<DocumentCheckRequest>,
) -> Json<DocumentCheck> {
    Json(DocumentCheck::evaluate(&request.uploaded))
}
