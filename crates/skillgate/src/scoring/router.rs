use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::evaluation::EvaluationError;
use super::evidence::EvidenceSet;
use super::report::ScorecardView;
use super::repository::{EvaluationId, EvaluationRepository, RepositoryError, ResultPublisher};
use super::service::{EvaluationService, EvaluationServiceError};

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub challenge_id: String,
    pub evidence: EvidenceSet,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: String,
    pub scorecard: ScorecardView,
}

/// Router builder exposing HTTP endpoints for evaluation and retrieval.
pub fn evaluation_router<R, P>(service: Arc<EvaluationService<R, P>>) -> Router
where
    R: EvaluationRepository + 'static,
    P: ResultPublisher + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(evaluate_handler::<R, P>))
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(record_handler::<R, P>),
        )
        .route("/api/v1/challenges", get(challenges_handler::<R, P>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: ResultPublisher + 'static,
{
    match service.evaluate(&request.challenge_id, &request.evidence) {
        Ok(record) => {
            let response = EvaluationResponse {
                evaluation_id: record.evaluation_id.0.clone(),
                scorecard: record.scorecard(),
            };
            (StatusCode::CREATED, axum::Json(response)).into_response()
        }
        Err(EvaluationServiceError::UnknownChallenge { id }) => {
            let payload = json!({
                "error": format!("unknown challenge '{id}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(EvaluationServiceError::Evaluation(error)) => {
            // Construction failures are reported as failures, never as a
            // zero score.
            let kind = match &error {
                EvaluationError::Configuration(_) => "configuration",
                EvaluationError::Evidence(_) => "evidence",
            };
            let payload = json!({
                "error": format!("evaluation could not be completed: {error}"),
                "kind": kind,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(EvaluationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "evaluation already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn record_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: ResultPublisher + 'static,
{
    let id = EvaluationId(evaluation_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(EvaluationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("no evaluation '{}'", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn challenges_handler<R, P>(
    State(service): State<Arc<EvaluationService<R, P>>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    P: ResultPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.challenges())).into_response()
}
