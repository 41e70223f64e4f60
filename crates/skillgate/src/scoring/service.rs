use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::catalog::{ChallengeCatalog, ChallengeSummary};
use super::evaluation::{EvaluationEngine, EvaluationError, ScoringPolicy};
use super::evidence::EvidenceSet;
use super::repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, ExplanationRequest, PublisherError,
    RepositoryError, ResultPublisher,
};

/// Service composing the challenge catalog, the evaluation engine, storage,
/// and the explanation handoff.
pub struct EvaluationService<R, P> {
    catalog: ChallengeCatalog,
    policy: ScoringPolicy,
    repository: Arc<R>,
    publisher: Arc<P>,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

impl<R, P> EvaluationService<R, P>
where
    R: EvaluationRepository + 'static,
    P: ResultPublisher + 'static,
{
    pub fn new(
        catalog: ChallengeCatalog,
        policy: ScoringPolicy,
        repository: Arc<R>,
        publisher: Arc<P>,
    ) -> Self {
        Self {
            catalog,
            policy,
            repository,
            publisher,
        }
    }

    /// Run one evaluation and persist the outcome.
    ///
    /// Each call is independent: the evidence and rubric are borrowed for
    /// the duration of the call and the returned record is freshly owned.
    pub fn evaluate(
        &self,
        challenge_id: &str,
        evidence: &EvidenceSet,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let definition = self.catalog.get(challenge_id).ok_or_else(|| {
            EvaluationServiceError::UnknownChallenge {
                id: challenge_id.to_string(),
            }
        })?;

        let engine = EvaluationEngine::new(definition.clone(), self.policy.clone());
        let result = engine.evaluate(evidence)?;

        let record = EvaluationRecord {
            evaluation_id: next_evaluation_id(),
            result,
            evaluated_at: Utc::now(),
        };
        let stored = self.repository.insert(record)?;

        self.publisher.publish(ExplanationRequest::from(&stored))?;
        info!(
            evaluation = %stored.evaluation_id.0,
            challenge = challenge_id,
            final_score = stored.result.final_score,
            band = stored.result.recommendation.label(),
            "evaluation completed"
        );

        Ok(stored)
    }

    /// Fetch a stored evaluation for API responses.
    pub fn get(&self, id: &EvaluationId) -> Result<EvaluationRecord, EvaluationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn challenges(&self) -> Vec<ChallengeSummary> {
        self.catalog.summaries()
    }
}

/// Error raised by the evaluation service facade.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("unknown challenge '{id}'")]
    UnknownChallenge { id: String },
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publisher(#[from] PublisherError),
}
