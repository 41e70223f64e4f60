use serde::{Deserialize, Serialize};

use super::evidence::EvidenceKind;

/// Identifier wrapper for rubric criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionId(pub String);

impl CriterionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Threshold a single evidence entry must clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidencePredicate {
    /// Entry exists with a truthy value.
    Present,
    /// Entry value is a count of at least this many.
    MinCount(u64),
    /// Entry carries at least this many source references.
    MinSources(usize),
}

/// Which evidence kind a criterion inspects and the bar it sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRequirement {
    pub kind: EvidenceKind,
    pub predicate: EvidencePredicate,
}

impl EvidenceRequirement {
    pub fn new(kind: EvidenceKind, predicate: EvidencePredicate) -> Self {
        Self { kind, predicate }
    }
}

/// Interpolation rule applied when evidence clears only part of the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialCredit {
    /// All-or-nothing: anything short of full satisfaction scores the floor.
    Denied,
    /// Floor-to-max interpolation by observed/required ratio, rounded down.
    Linear,
    /// Explicit count thresholds mapping to fixed point values.
    Tiered(Vec<CreditTier>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTier {
    pub at_least: u64,
    pub points: u32,
}

fn default_floor() -> u32 {
    2
}

fn default_partial_credit() -> PartialCredit {
    PartialCredit::Denied
}

/// One scoring rule inside a challenge rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub description: String,
    pub max_points: u32,
    #[serde(default = "default_floor")]
    pub floor: u32,
    pub requirements: Vec<EvidenceRequirement>,
    #[serde(default = "default_partial_credit")]
    pub partial_credit: PartialCredit,
}

/// Declarative rubric for one evaluation scenario.
///
/// The total-points invariant is enforced here, at construction, so a
/// malformed rubric can never reach the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChallengeDocument", into = "ChallengeDocument")]
pub struct ChallengeDefinition {
    id: String,
    name: String,
    base_score: u32,
    criteria: Vec<Criterion>,
}

impl ChallengeDefinition {
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_score: u32,
        criteria: Vec<Criterion>,
    ) -> Result<Self, ConfigurationError> {
        let id = id.into();
        if base_score == 0 {
            return Err(ConfigurationError::NonPositiveBaseScore { challenge: id });
        }
        if criteria.is_empty() {
            return Err(ConfigurationError::EmptyRubric { challenge: id });
        }

        let mut seen = Vec::with_capacity(criteria.len());
        for criterion in &criteria {
            validate_criterion(criterion)?;
            if seen.contains(&criterion.id) {
                return Err(ConfigurationError::DuplicateCriterion {
                    id: criterion.id.0.clone(),
                });
            }
            seen.push(criterion.id.clone());
        }

        let declared: u32 = criteria.iter().map(|criterion| criterion.max_points).sum();
        if declared != base_score {
            return Err(ConfigurationError::PointsMismatch {
                challenge: id,
                expected: base_score,
                actual: declared,
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            base_score,
            criteria,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_score(&self) -> u32 {
        self.base_score
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

pub(crate) fn validate_criterion(criterion: &Criterion) -> Result<(), ConfigurationError> {
    if criterion.max_points == 0 {
        return Err(ConfigurationError::NonPositiveMaxPoints {
            id: criterion.id.0.clone(),
        });
    }
    if criterion.floor >= criterion.max_points {
        return Err(ConfigurationError::FloorAboveMax {
            id: criterion.id.0.clone(),
            floor: criterion.floor,
            max_points: criterion.max_points,
        });
    }
    if criterion.requirements.is_empty() {
        return Err(ConfigurationError::MissingRequirements {
            id: criterion.id.0.clone(),
        });
    }
    if let PartialCredit::Tiered(tiers) = &criterion.partial_credit {
        // Full credit is reserved for the full predicate; a tier reaching
        // max points would award it from partial evidence.
        if tiers.iter().any(|tier| tier.points >= criterion.max_points) {
            return Err(ConfigurationError::TierAboveMax {
                id: criterion.id.0.clone(),
            });
        }
    }
    Ok(())
}

/// Serde-facing mirror so deserialized rubrics pass through `try_new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChallengeDocument {
    id: String,
    name: String,
    base_score: u32,
    criteria: Vec<Criterion>,
}

impl TryFrom<ChallengeDocument> for ChallengeDefinition {
    type Error = ConfigurationError;

    fn try_from(doc: ChallengeDocument) -> Result<Self, Self::Error> {
        Self::try_new(doc.id, doc.name, doc.base_score, doc.criteria)
    }
}

impl From<ChallengeDefinition> for ChallengeDocument {
    fn from(definition: ChallengeDefinition) -> Self {
        Self {
            id: definition.id,
            name: definition.name,
            base_score: definition.base_score,
            criteria: definition.criteria,
        }
    }
}

/// Malformed rubric configuration. Fatal and never silently corrected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("challenge '{challenge}' declares a base score of zero")]
    NonPositiveBaseScore { challenge: String },
    #[error("challenge '{challenge}' declares no criteria")]
    EmptyRubric { challenge: String },
    #[error("criterion '{id}' declares non-positive max points")]
    NonPositiveMaxPoints { id: String },
    #[error("criterion '{id}' floor {floor} is not below max points {max_points}")]
    FloorAboveMax {
        id: String,
        floor: u32,
        max_points: u32,
    },
    #[error("criterion '{id}' inspects no evidence kinds")]
    MissingRequirements { id: String },
    #[error("criterion '{id}' defines a partial-credit tier at or above max points")]
    TierAboveMax { id: String },
    #[error("criterion '{id}' appears more than once")]
    DuplicateCriterion { id: String },
    #[error("challenge '{challenge}' criteria sum to {actual}, declared base score is {expected}")]
    PointsMismatch {
        challenge: String,
        expected: u32,
        actual: u32,
    },
}
