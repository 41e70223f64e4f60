mod bonus;
mod policy;
mod rules;

pub use bonus::BonusCategory;
pub use policy::{RecommendationBand, ScoringPolicy};

use serde::{Deserialize, Serialize};

use super::challenge::{ChallengeDefinition, ConfigurationError, CriterionId};
use super::evidence::{EvidenceError, EvidenceSet, SourceRef};

/// What a score entry was awarded for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Criterion(CriterionId),
    Bonus(BonusCategory),
}

impl EntrySource {
    pub fn label(&self) -> String {
        match self {
            EntrySource::Criterion(id) => id.0.clone(),
            EntrySource::Bonus(category) => category.label().to_string(),
        }
    }
}

/// Evaluation outcome for one criterion or bonus category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub source: EntrySource,
    pub points: u32,
    pub max_points: u32,
    pub references: Vec<SourceRef>,
    pub rationale: String,
}

/// Stateless evaluator applying one rubric and scoring policy to evidence.
pub struct EvaluationEngine {
    definition: ChallengeDefinition,
    policy: ScoringPolicy,
}

impl EvaluationEngine {
    pub fn new(definition: ChallengeDefinition, policy: ScoringPolicy) -> Self {
        Self { definition, policy }
    }

    pub fn definition(&self) -> &ChallengeDefinition {
        &self.definition
    }

    /// Pure, single-pass evaluation: criterion entries, bonus entries,
    /// aggregation, and band mapping. Borrows its inputs read-only and
    /// returns a freshly owned result.
    pub fn evaluate(&self, evidence: &EvidenceSet) -> Result<EvaluationResult, EvaluationError> {
        let mut entries = Vec::with_capacity(self.definition.criteria().len());
        for criterion in self.definition.criteria() {
            entries.push(rules::score_criterion(criterion, evidence)?);
        }

        let bonuses = bonus::compute_bonuses(evidence, &self.policy);
        self.assemble(entries, bonuses)
    }

    fn assemble(
        &self,
        criterion_entries: Vec<ScoreEntry>,
        bonus_entries: Vec<ScoreEntry>,
    ) -> Result<EvaluationResult, EvaluationError> {
        // Zero-guessing re-check before the result leaves the engine: any
        // credit above the defined floor must cite evidence.
        for (criterion, entry) in self.definition.criteria().iter().zip(&criterion_entries) {
            if entry.points > criterion.floor && entry.references.is_empty() {
                return Err(EvidenceError::UnsupportedAward {
                    entry: entry.source.label(),
                    points: entry.points,
                }
                .into());
            }
        }
        for entry in &bonus_entries {
            if entry.points > 0 && entry.references.is_empty() {
                return Err(EvidenceError::UnsupportedAward {
                    entry: entry.source.label(),
                    points: entry.points,
                }
                .into());
            }
        }

        let raw_score: u32 = criterion_entries.iter().map(|entry| entry.points).sum();
        let bonus_score: u32 = bonus_entries
            .iter()
            .map(|entry| entry.points)
            .sum::<u32>()
            .min(self.policy.bonus_cap);
        let final_score = raw_score + bonus_score;
        let base_score = self.definition.base_score();
        // Percentage tracks the base scale only; bonuses raise the final
        // score but never the percentage.
        let percentage = raw_score as f32 * 100.0 / base_score as f32;

        let mut entries = criterion_entries;
        entries.extend(bonus_entries);

        Ok(EvaluationResult {
            challenge_id: self.definition.id().to_string(),
            raw_score,
            bonus_score,
            final_score,
            base_score,
            percentage,
            recommendation: self.policy.band(final_score),
            entries,
        })
    }
}

/// Immutable output of one evaluation: criterion entries in rubric order,
/// then bonus entries in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub challenge_id: String,
    pub raw_score: u32,
    pub bonus_score: u32,
    pub final_score: u32,
    pub base_score: u32,
    pub percentage: f32,
    pub recommendation: RecommendationBand,
    pub entries: Vec<ScoreEntry>,
}

impl EvaluationResult {
    pub fn criterion_entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.source, EntrySource::Criterion(_)))
    }

    pub fn bonus_entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.source, EntrySource::Bonus(_)))
    }
}

/// Failure modes of a single evaluation. Never caught-and-defaulted; a
/// failed evaluation is not a score.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Evidence(#[from] EvidenceError),
}
