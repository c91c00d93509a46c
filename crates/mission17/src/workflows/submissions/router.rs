use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{SubmissionDraft, SubmissionId};
use super::repository::{PointsLedger, RepositoryError, SubmissionRepository, SubmissionStatusView};
use super::service::{SubmissionService, SubmissionServiceError};

/// Body accepted by the reject endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Router builder exposing intake, history, and admin decision endpoints.
pub fn submission_router<R, L>(service: Arc<SubmissionService<R, L>>) -> Router
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    Router::new()
        .route("/api/v1/submissions", post(submit_handler::<R, L>))
        .route("/api/v1/submissions/:submission_id", get(status_handler::<R, L>))
        .route(
            "/api/v1/submissions/:submission_id/approve",
            post(approve_handler::<R, L>),
        )
        .route(
            "/api/v1/submissions/:submission_id/reject",
            post(reject_handler::<R, L>),
        )
        .route(
            "/api/v1/users/:user_id/submissions",
            get(history_handler::<R, L>),
        )
        .route("/api/v1/review-queue", get(review_queue_handler::<R, L>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
    axum::Json(draft): axum::Json<SubmissionDraft>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    match service.submit(draft) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    match service.get(&SubmissionId(submission_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    match service.approve(&SubmissionId(submission_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
    Path(submission_id): Path<String>,
    request: Option<axum::Json<RejectRequest>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    let reason = request.and_then(|axum::Json(request)| request.reason);
    match service.reject(&SubmissionId(submission_id), reason) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    match service.history(&user_id) {
        Ok(records) => {
            let views: Vec<SubmissionStatusView> =
                records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn review_queue_handler<R, L>(
    State(service): State<Arc<SubmissionService<R, L>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    match service.review_queue() {
        Ok(records) => {
            let views: Vec<SubmissionStatusView> =
                records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: SubmissionServiceError) -> Response {
    let status = match &err {
        SubmissionServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SubmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
