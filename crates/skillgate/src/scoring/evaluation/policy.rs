use serde::{Deserialize, Serialize};

/// Categorical hiring recommendation derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBand {
    DoNotHire,
    HireWithMentorship,
    StrongInternshipHire,
    ExceptionalDirectInterview,
}

impl RecommendationBand {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationBand::DoNotHire => "Do Not Hire",
            RecommendationBand::HireWithMentorship => "Hire with Mentorship",
            RecommendationBand::StrongInternshipHire => "Strong Internship Hire",
            RecommendationBand::ExceptionalDirectInterview => "Exceptional - Direct Interview",
        }
    }
}

/// Immutable scoring knobs threaded into aggregation and band mapping.
///
/// Band thresholds are inclusive lower bounds; bonus caps bound how far the
/// final score can exceed the base scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub bonus_category_max: u32,
    pub bonus_cap: u32,
    pub mentorship_at: u32,
    pub strong_hire_at: u32,
    pub exceptional_at: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            bonus_category_max: 5,
            bonus_cap: 15,
            mentorship_at: 60,
            strong_hire_at: 75,
            exceptional_at: 90,
        }
    }
}

impl ScoringPolicy {
    /// Total step function over final scores: no gaps, no overlaps.
    pub fn band(&self, final_score: u32) -> RecommendationBand {
        if final_score >= self.exceptional_at {
            RecommendationBand::ExceptionalDirectInterview
        } else if final_score >= self.strong_hire_at {
            RecommendationBand::StrongInternshipHire
        } else if final_score >= self.mentorship_at {
            RecommendationBand::HireWithMentorship
        } else {
            RecommendationBand::DoNotHire
        }
    }
}
