use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluation::EvaluationResult;
use super::report::{CitationBlockView, ScorecardView};

/// Identifier wrapper for completed evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// Stored outcome of one evaluation request. The engine itself holds no
/// state; the caller owns persistence through this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluation_id: EvaluationId,
    pub result: EvaluationResult,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn scorecard(&self) -> ScorecardView {
        self.result.scorecard()
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Handoff payload for the external explanation collaborator: everything it
/// needs to produce citation-backed prose without re-running the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub evaluation_id: EvaluationId,
    pub challenge_id: String,
    pub final_score: u32,
    pub recommendation: String,
    pub blocks: Vec<CitationBlockView>,
}

impl From<&EvaluationRecord> for ExplanationRequest {
    fn from(record: &EvaluationRecord) -> Self {
        Self {
            evaluation_id: record.evaluation_id.clone(),
            challenge_id: record.result.challenge_id.clone(),
            final_score: record.result.final_score,
            recommendation: record.result.recommendation.label().to_string(),
            blocks: record.result.citation_blocks(),
        }
    }
}

/// Trait describing the outbound hook toward the explanation collaborator.
pub trait ResultPublisher: Send + Sync {
    fn publish(&self, request: ExplanationRequest) -> Result<(), PublisherError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    #[error("publisher transport unavailable: {0}")]
    Transport(String),
}
