//! Evidence-grounded challenge scoring.
//!
//! The evaluation engine is a pure function of a validated evidence set and
//! a validated challenge rubric; everything around it is plumbing. No point
//! is awarded above a criterion's floor without a citable source reference.

pub mod catalog;
pub mod challenge;
pub mod evaluation;
pub mod evidence;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ChallengeCatalog, ChallengeSummary};
pub use challenge::{
    ChallengeDefinition, ConfigurationError, CreditTier, Criterion, CriterionId,
    EvidencePredicate, EvidenceRequirement, PartialCredit,
};
pub use evaluation::{
    BonusCategory, EntrySource, EvaluationEngine, EvaluationError, EvaluationResult,
    RecommendationBand, ScoreEntry, ScoringPolicy,
};
pub use evidence::{
    EvidenceEntry, EvidenceError, EvidenceKind, EvidenceSet, EvidenceValue, LineRange, SourceRef,
};
pub use report::{CitationBlockView, ScoreLineView, ScorecardView};
pub use repository::{
    EvaluationId, EvaluationRecord, EvaluationRepository, ExplanationRequest, PublisherError,
    RepositoryError, ResultPublisher,
};
pub use router::{evaluation_router, EvaluationRequest, EvaluationResponse};
pub use service::{EvaluationService, EvaluationServiceError};
