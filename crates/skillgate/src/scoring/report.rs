use serde::{Deserialize, Serialize};

use super::evaluation::{EvaluationResult, RecommendationBand};

/// Compact numeric breakdown for the presentation layer: scores and band
/// only, no evidence references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardView {
    pub challenge_id: String,
    pub raw_score: u32,
    pub base_score: u32,
    pub bonus_score: u32,
    pub final_score: u32,
    pub percentage: f32,
    pub recommendation: RecommendationBand,
    pub recommendation_label: String,
    pub lines: Vec<ScoreLineView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLineView {
    pub label: String,
    pub points: u32,
    pub max_points: u32,
}

/// Citation-bearing block for the explanation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationBlockView {
    pub label: String,
    pub points: u32,
    pub max_points: u32,
    pub rationale: String,
    pub citations: Vec<String>,
}

impl EvaluationResult {
    pub fn scorecard(&self) -> ScorecardView {
        ScorecardView {
            challenge_id: self.challenge_id.clone(),
            raw_score: self.raw_score,
            base_score: self.base_score,
            bonus_score: self.bonus_score,
            final_score: self.final_score,
            percentage: self.percentage,
            recommendation: self.recommendation,
            recommendation_label: self.recommendation.label().to_string(),
            lines: self
                .entries
                .iter()
                .map(|entry| ScoreLineView {
                    label: entry.source.label(),
                    points: entry.points,
                    max_points: entry.max_points,
                })
                .collect(),
        }
    }

    pub fn citation_blocks(&self) -> Vec<CitationBlockView> {
        self.entries
            .iter()
            .map(|entry| CitationBlockView {
                label: entry.source.label(),
                points: entry.points,
                max_points: entry.max_points,
                rationale: entry.rationale.clone(),
                citations: entry
                    .references
                    .iter()
                    .map(|reference| reference.citation())
                    .collect(),
            })
            .collect()
    }
}
