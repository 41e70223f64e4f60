use std::sync::Arc;

use super::common::*;
use crate::scoring::catalog::ChallengeCatalog;
use crate::scoring::evaluation::ScoringPolicy;
use crate::scoring::repository::{EvaluationId, RepositoryError};
use crate::scoring::service::{EvaluationService, EvaluationServiceError};

#[test]
fn evaluate_stores_the_record_and_hands_off_citations() {
    let (service, repository, publisher) = build_service();

    let record = service
        .evaluate("general-engineering", &evidence_strong())
        .expect("evaluation succeeds");

    assert!(record.evaluation_id.0.starts_with("eval-"));
    let stored = repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .get(&record.evaluation_id)
        .cloned()
        .expect("record persisted");
    assert_eq!(stored.result.final_score, record.result.final_score);

    let requests = publisher.requests();
    assert_eq!(requests.len(), 1);
    let handoff = &requests[0];
    assert_eq!(handoff.evaluation_id, record.evaluation_id);
    assert_eq!(handoff.recommendation, "Exceptional - Direct Interview");
    assert!(handoff
        .blocks
        .iter()
        .any(|block| !block.citations.is_empty()));
}

#[test]
fn unknown_challenge_is_an_error_not_a_zero_score() {
    let (service, _repository, publisher) = build_service();

    let error = service
        .evaluate("nonexistent", &evidence_strong())
        .expect_err("unknown challenge rejected");

    assert!(matches!(
        error,
        EvaluationServiceError::UnknownChallenge { .. }
    ));
    assert!(publisher.requests().is_empty());
}

#[test]
fn repository_conflict_surfaces_to_the_caller() {
    let repository = Arc::new(ConflictRepository);
    let publisher = Arc::new(MemoryPublisher::default());
    let service = EvaluationService::new(
        ChallengeCatalog::builtin(),
        ScoringPolicy::default(),
        repository,
        publisher.clone(),
    );

    let error = service
        .evaluate("general-engineering", &evidence_strong())
        .expect_err("conflict surfaces");

    assert!(matches!(
        error,
        EvaluationServiceError::Repository(RepositoryError::Conflict)
    ));
    assert!(publisher.requests().is_empty());
}

#[test]
fn fetching_a_missing_evaluation_reports_not_found() {
    let (service, _repository, _publisher) = build_service();

    let error = service
        .get(&EvaluationId("eval-999999".to_string()))
        .expect_err("missing record reported");

    assert!(matches!(
        error,
        EvaluationServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn floors_alone_never_reach_the_mentorship_band() {
    let (service, _repository, _publisher) = build_service();

    let record = service
        .evaluate("general-engineering", &evidence_empty())
        .expect("evaluation succeeds");

    assert_eq!(record.result.raw_score, 15);
    assert_eq!(record.result.recommendation.label(), "Do Not Hire");
}
